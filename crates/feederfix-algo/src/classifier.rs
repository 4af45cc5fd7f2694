/// Sentinel substrings that mark an attribute value as a placeholder.
///
/// Matching is by substring, not equality: with the default sentinels
/// `"DEFAULT_1KV"` is a placeholder, and so is any real type id that happens
/// to contain `DEFAULT` or `N/A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSet {
    sentinels: Vec<String>,
}

impl PlaceholderSet {
    pub fn new<I, S>(sentinels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sentinels: sentinels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_placeholder(&self, value: &str) -> bool {
        self.sentinels
            .iter()
            .any(|sentinel| value.contains(sentinel.as_str()))
    }

}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self::new(["DEFAULT", "N/A"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_sentinel_is_placeholder() {
        let set = PlaceholderSet::default();
        assert!(set.is_placeholder("DEFAULT"));
        assert!(set.is_placeholder("N/A"));
    }

    #[test]
    fn substring_matches() {
        let set = PlaceholderSet::default();
        assert!(set.is_placeholder("DEFAULT_1KV"));
        assert!(set.is_placeholder("OH_N/A_3PH"));
    }

    #[test]
    fn concrete_values_pass() {
        let set = PlaceholderSet::default();
        assert!(!set.is_placeholder("336AL"));
        assert!(!set.is_placeholder("4CU"));
        assert!(!set.is_placeholder("default"));
    }

    #[test]
    fn custom_sentinels() {
        let set = PlaceholderSet::new(vec!["TBD".to_string()]);
        assert!(set.is_placeholder("CABLE_TBD"));
        assert!(!set.is_placeholder("DEFAULT"));
    }
}
