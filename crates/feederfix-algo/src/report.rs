//! Tabular views of a resolution run.
//!
//! Candidate sentinels (`CA`, `N/A`) exist only here; the resolver itself
//! works with [`Candidate`](crate::candidate::Candidate).

use serde::Serialize;

use crate::records::{ChangeRecord, Keyed, UnresolvedRecord};

pub const CHANGED_TITLE: &str = "Changed Conductors";
pub const INPUT_REQUIRED_TITLE: &str = "Input Required Conductors";
pub const CHANGED_HEADERS: [&str; 4] = ["SECTION", "OLD", "NEW", "LINEID"];
pub const INPUT_REQUIRED_HEADERS: [&str; 4] = ["SECTION", "UPSTREAM", "DOWNSTREAM", "LINEID"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// `"<section>, <attribute>"`
    pub key: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

}

pub fn changed_table(changes: &[ChangeRecord]) -> ReportTable {
    let mut table = ReportTable::new(CHANGED_TITLE, &CHANGED_HEADERS);
    table.rows = changes
        .iter()
        .map(|change| ReportRow {
            key: change.key(),
            cells: vec![
                change.section.to_string(),
                change.old.clone(),
                change.new.clone(),
                change.attribute.clone(),
            ],
        })
        .collect();
    table
}

pub fn input_required_table(unresolved: &[UnresolvedRecord]) -> ReportTable {
    let mut table = ReportTable::new(INPUT_REQUIRED_TITLE, &INPUT_REQUIRED_HEADERS);
    table.rows = unresolved
        .iter()
        .map(|record| ReportRow {
            key: record.key(),
            cells: vec![
                record.section().to_string(),
                record.upstream.to_string(),
                record.downstream.to_string(),
                record.attribute.clone(),
            ],
        })
        .collect();
    table
}
