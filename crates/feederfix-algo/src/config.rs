//! Resolver configuration.
//!
//! [`ResolverConfig`] carries the traversal horizon, the load-similarity
//! threshold, the placeholder sentinels, and the category table that tells the
//! resolver which attributes each conductor family owns. Every field has a
//! default, so a partial TOML file is valid:
//!
//! ```toml
//! max_depth = 4
//! placeholders = ["DEFAULT", "N/A", "UNKNOWN"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use feederfix_core::{ConductorCategory, FeederError, FeederResult};
use serde::{Deserialize, Serialize};

use crate::classifier::PlaceholderSet;

/// Work queue a category's placeholder devices are resolved from.
///
/// Queues are processed in [`Worklist::ORDER`]. Categories that share a queue
/// are drained in category-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Worklist {
    Overhead,
    OverheadByPhase,
    Underground,
}

impl Worklist {
    pub const ORDER: [Worklist; 3] = [
        Worklist::Overhead,
        Worklist::OverheadByPhase,
        Worklist::Underground,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Worklist::Overhead => "overhead",
            Worklist::OverheadByPhase => "overhead_by_phase",
            Worklist::Underground => "underground",
        }
    }
}

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub category: ConductorCategory,
    /// Attribute names resolved together for devices of this category
    pub attributes: Vec<String>,
    pub worklist: Worklist,
}

impl CategorySpec {
    pub fn new(category: ConductorCategory, attributes: &[&str], worklist: Worklist) -> Self {
        Self {
            category,
            attributes: attributes.iter().map(|name| name.to_string()).collect(),
            worklist,
        }
    }
}

/// Default table. Row order is also the index registration order, which
/// decides which device governs a section that carries several.
pub fn default_categories() -> Vec<CategorySpec> {
    vec![
        CategorySpec::new(
            ConductorCategory::OverheadLine,
            &["LineID"],
            Worklist::Overhead,
        ),
        CategorySpec::new(
            ConductorCategory::OverheadByPhase,
            &[
                "PhaseConductorIDA",
                "PhaseConductorIDB",
                "PhaseConductorIDC",
                "NeutralConductorID1",
                "NeutralConductorID2",
            ],
            Worklist::OverheadByPhase,
        ),
        CategorySpec::new(
            ConductorCategory::OverheadLineUnbalanced,
            &["LineID"],
            Worklist::Overhead,
        ),
        CategorySpec::new(
            ConductorCategory::Underground,
            &["CableID"],
            Worklist::Underground,
        ),
    ]
}

/// Tunables for a resolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Hop horizon for upstream/downstream walks.
    pub max_depth: usize,

    /// Maximum relative downstream-load difference for a neighbor to count
    /// as load-similar (strict).
    pub max_kva_diff: f64,

    /// Substrings that mark an attribute value as a placeholder.
    pub placeholders: Vec<String>,

    /// Extra passes over still-unresolved attributes after the first pass.
    pub refinement_passes: usize,

    pub categories: Vec<CategorySpec>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_kva_diff: 0.1,
            placeholders: vec!["DEFAULT".to_string(), "N/A".to_string()],
            refinement_passes: 1,
            categories: default_categories(),
        }
    }
}

impl ResolverConfig {
    pub fn from_toml_str(raw: &str) -> FeederResult<Self> {
        let config: ResolverConfig =
            toml::from_str(raw).map_err(|err| FeederError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> FeederResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> FeederResult<String> {
        toml::to_string_pretty(self).map_err(|err| FeederError::Other(err.to_string()))
    }

    pub fn validate(&self) -> FeederResult<()> {
        if !self.max_kva_diff.is_finite() || self.max_kva_diff < 0.0 {
            return Err(FeederError::Config(format!(
                "max_kva_diff must be a finite non-negative ratio, got {}",
                self.max_kva_diff
            )));
        }
        if self.placeholders.is_empty() {
            return Err(FeederError::Config(
                "at least one placeholder sentinel is required".into(),
            ));
        }
        if self.placeholders.iter().any(|sentinel| sentinel.is_empty()) {
            return Err(FeederError::Config(
                "placeholder sentinels must not be empty strings".into(),
            ));
        }
        let mut seen = HashSet::new();
        for spec in &self.categories {
            if !seen.insert(spec.category) {
                return Err(FeederError::Config(format!(
                    "category '{}' listed more than once",
                    spec.category
                )));
            }
            if spec.attributes.is_empty() {
                return Err(FeederError::Config(format!(
                    "category '{}' has no attributes",
                    spec.category
                )));
            }
        }
        Ok(())
    }

    pub fn category(&self, category: ConductorCategory) -> Option<&CategorySpec> {
        self.categories.iter().find(|spec| spec.category == category)
    }

    pub fn placeholder_set(&self) -> PlaceholderSet {
        PlaceholderSet::new(self.placeholders.iter().cloned())
    }
}
