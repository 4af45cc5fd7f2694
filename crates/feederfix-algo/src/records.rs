//! Change and deferral records produced by the resolver.

use feederfix_core::{DeviceRef, SectionId};
use hashbrown::HashMap;
use serde::Serialize;

use crate::candidate::Candidate;
use crate::policy::Rule;

/// Stable row key `"<section>, <attribute>"`.
pub fn composite_key(section: &SectionId, attribute: &str) -> String {
    format!("{section}, {attribute}")
}

/// One attribute rewritten on one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub section: SectionId,
    pub attribute: String,
    pub old: String,
    pub new: String,
    pub rule: Rule,
}

/// One attribute the resolver could not settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRecord {
    pub device: DeviceRef,
    pub attribute: String,
    pub upstream: Candidate,
    pub downstream: Candidate,
}

impl UnresolvedRecord {
    pub fn section(&self) -> &SectionId {
        &self.device.section
    }
}

pub trait Keyed {
    fn key(&self) -> String;
}

impl Keyed for ChangeRecord {
    fn key(&self) -> String {
        composite_key(&self.section, &self.attribute)
    }
}

impl Keyed for UnresolvedRecord {
    fn key(&self) -> String {
        composite_key(self.section(), &self.attribute)
    }
}

/// Insertion-ordered record set keyed by [`composite_key`].
///
/// Recording a key a second time replaces the stored record but keeps its
/// original position.
#[derive(Debug, Clone)]
pub struct Ledger<T> {
    records: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Keyed> Ledger<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn record(&mut self, record: T) {
        let key = record.key();
        match self.positions.get(&key) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.positions.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.records
    }
}

impl<T: Keyed> Default for Ledger<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Ledger<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(section: &str, attribute: &str, new: &str) -> ChangeRecord {
        ChangeRecord {
            section: SectionId::new(section),
            attribute: attribute.to_string(),
            old: "DEFAULT".to_string(),
            new: new.to_string(),
            rule: Rule::UpstreamOnly,
        }
    }

    #[test]
    fn key_format() {
        assert_eq!(composite_key(&SectionId::new("S12"), "LineID"), "S12, LineID");
    }

    #[test]
    fn preserves_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.record(change("S2", "LineID", "336AL"));
        ledger.record(change("S1", "LineID", "4CU"));
        let order: Vec<&str> = ledger.iter().map(|c| c.section.as_str()).collect();
        assert_eq!(order, vec!["S2", "S1"]);
    }

    #[test]
    fn rerecording_replaces_in_place() {
        let mut ledger = Ledger::new();
        ledger.record(change("S1", "LineID", "336AL"));
        ledger.record(change("S2", "LineID", "4CU"));
        ledger.record(change("S1", "LineID", "1/0AL"));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.iter().next().unwrap().new, "1/0AL");
        let keys: Vec<String> = ledger.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["S1, LineID", "S2, LineID"]);
    }
}
