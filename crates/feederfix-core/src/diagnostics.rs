//! Data smells noticed while building a feeder.
//!
//! Hard problems abort the import with a [`crate::FeederError`]; what lands
//! here is something the resolver can work around but a modeler should look
//! at. Each warning has a category for grouping ("duplicate", "attribute",
//! "load") and names the section it concerns.
//!
//! ```
//! use feederfix_core::diagnostics::Diagnostics;
//!
//! let mut diag = Diagnostics::new();
//! diag.warn("duplicate", "Section S4", "device #7 is shadowed by device #3");
//! assert_eq!(diag.summary(), "1 warning");
//! ```

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticIssue {
    pub category: String,
    /// Entity the warning is about, e.g. `Section S12`
    pub entity: String,
    pub message: String,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.entity, self.message)
    }
}

/// Warnings collected over one import, in the order they were raised.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        category: impl Into<String>,
        entity: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.issues.push(DiagnosticIssue {
            category: category.into(),
            entity: entity.into(),
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn summary(&self) -> String {
        match self.issues.len() {
            0 => "No issues".to_string(),
            1 => "1 warning".to_string(),
            n => format!("{n} warnings"),
        }
    }
}
