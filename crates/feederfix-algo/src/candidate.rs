use std::fmt;

/// Rendered form of [`Candidate::Conflict`] in reports.
pub const CANNOT_ASSIGN: &str = "CA";
/// Rendered form of [`Candidate::Unset`] in reports.
pub const NOT_FOUND: &str = "N/A";

/// Running candidate for one attribute during a directional walk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Candidate {
    /// Nothing usable seen yet
    #[default]
    Unset,
    /// Conflicting evidence, or nothing found within the horizon. Absorbing.
    Conflict,
    Value(String),
}

impl Candidate {
    /// Fold one observed concrete value into the running candidate.
    pub fn merge(&mut self, observed: &str) {
        match self {
            Candidate::Unset => *self = Candidate::Value(observed.to_string()),
            Candidate::Value(current) if current == observed => {}
            Candidate::Value(_) => *self = Candidate::Conflict,
            Candidate::Conflict => {}
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Candidate::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Candidate::Unset)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Candidate::Conflict)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Unset => f.write_str(NOT_FOUND),
            Candidate::Conflict => f.write_str(CANNOT_ASSIGN),
            Candidate::Value(value) => f.write_str(value),
        }
    }
}

/// Candidates for every requested attribute of one walk, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    entries: Vec<(String, Candidate)>,
}

impl CandidateSet {
    pub fn new(attributes: &[String]) -> Self {
        Self {
            entries: attributes
                .iter()
                .map(|name| (name.clone(), Candidate::Unset))
                .collect(),
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&Candidate> {
        self.entries
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, candidate)| candidate)
    }

    pub fn get_mut(&mut self, attribute: &str) -> Option<&mut Candidate> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == attribute)
            .map(|(_, candidate)| candidate)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Candidate)> {
        self.entries
            .iter()
            .map(|(name, candidate)| (name.as_str(), candidate))
    }

    /// Anything still unset becomes a conflict: no suitable candidate within
    /// the horizon.
    pub fn finalize(&mut self) {
        for (_, candidate) in &mut self.entries {
            if candidate.is_unset() {
                *candidate = Candidate::Conflict;
            }
        }
    }
}
