/// Decides whether two sections carry comparable downstream load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSimilarityGate {
    max_relative_diff: f64,
}

impl LoadSimilarityGate {
    pub fn new(max_relative_diff: f64) -> Self {
        Self { max_relative_diff }
    }

    /// `|candidate - reference| / reference < max_relative_diff`.
    ///
    /// A zero reference is never in range: similarity is undefined there.
    pub fn in_range(&self, reference_kva: f64, candidate_kva: f64) -> bool {
        if reference_kva == 0.0 {
            return false;
        }
        (candidate_kva - reference_kva).abs() / reference_kva < self.max_relative_diff
    }

    pub fn max_relative_diff(&self) -> f64 {
        self.max_relative_diff
    }
}
