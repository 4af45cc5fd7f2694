//! Section → governing-device index.
//!
//! Built once per run. The index only holds handles; attribute values live in
//! the network model, so fixes written during a pass are visible to every
//! later walk through the same index.

use feederfix_core::{DeviceRef, FeederResult, NetworkModel, SectionId};
use hashbrown::HashMap;
use tracing::debug;

use crate::classifier::PlaceholderSet;
use crate::config::{CategorySpec, Worklist};

#[derive(Debug, Clone, Default)]
pub struct ConductorIndex {
    devices: HashMap<SectionId, DeviceRef>,
    worklists: HashMap<Worklist, Vec<DeviceRef>>,
    shadowed: usize,
}

impl ConductorIndex {
    /// Register every device category in table order. The first device seen
    /// for a section governs it; later records on the same section are
    /// ignored. Governing devices with at least one placeholder attribute are
    /// queued on their category's worklist.
    pub fn build<N: NetworkModel>(
        model: &N,
        categories: &[CategorySpec],
        placeholders: &PlaceholderSet,
    ) -> FeederResult<Self> {
        let mut index = ConductorIndex::default();
        for spec in categories {
            for device in model.list_devices(spec.category) {
                if let Some(governing) = index.devices.get(&device.section) {
                    debug!(
                        section = %device.section,
                        ignored = %device.device,
                        governing = %governing.device,
                        "section already governed; ignoring device"
                    );
                    index.shadowed += 1;
                    continue;
                }
                index.devices.insert(device.section.clone(), device.clone());
                if needs_resolution(model, &device, &spec.attributes, placeholders)? {
                    index
                        .worklists
                        .entry(spec.worklist)
                        .or_default()
                        .push(device);
                }
            }
        }
        Ok(index)
    }

    pub fn get(&self, section: &SectionId) -> Option<&DeviceRef> {
        self.devices.get(section)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices queued for resolution on one worklist, in registration order.
    pub fn worklist(&self, worklist: Worklist) -> &[DeviceRef] {
        self.worklists
            .get(&worklist)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pending(&self) -> usize {
        self.worklists.values().map(Vec::len).sum()
    }

    /// Device records dropped because their section was already governed.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }
}

/// True if any of `attributes` currently holds a placeholder.
pub fn needs_resolution<N: NetworkModel>(
    model: &N,
    device: &DeviceRef,
    attributes: &[String],
    placeholders: &PlaceholderSet,
) -> FeederResult<bool> {
    for attribute in attributes {
        if placeholders.is_placeholder(&model.attribute(device, attribute)?) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_categories;
    use crate::test_utils::TestFeeder;
    use feederfix_core::ConductorCategory::*;

    #[test]
    fn partitions_placeholder_devices_by_worklist() {
        let feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 100.0, OverheadLine, &[("LineID", "336AL")])
            .section("S2", "A", "B", 90.0, OverheadLine, &[("LineID", "DEFAULT")])
            .section("S3", "B", "C", 80.0, OverheadLineUnbalanced, &[("LineID", "DEFAULT_3P")])
            .section(
                "S4",
                "C",
                "D",
                70.0,
                OverheadByPhase,
                &[
                    ("PhaseConductorIDA", "1/0AL"),
                    ("PhaseConductorIDB", "1/0AL"),
                    ("PhaseConductorIDC", "1/0AL"),
                    ("NeutralConductorID1", "N/A"),
                    ("NeutralConductorID2", "NONE"),
                ],
            )
            .section("S5", "D", "E", 60.0, Underground, &[("CableID", "DEFAULT")])
            .section("S6", "E", "F", 50.0, Underground, &[("CableID", "750CU")])
            .build();

        let index =
            ConductorIndex::build(&feeder, &default_categories(), &PlaceholderSet::default())
                .unwrap();
        assert_eq!(index.len(), 6);
        assert_eq!(index.pending(), 4);

        let overhead: Vec<&str> = index
            .worklist(Worklist::Overhead)
            .iter()
            .map(|d| d.section.as_str())
            .collect();
        assert_eq!(overhead, vec!["S2", "S3"]);
        assert_eq!(index.worklist(Worklist::OverheadByPhase).len(), 1);
        assert_eq!(index.worklist(Worklist::Underground)[0].section.as_str(), "S5");
    }

    #[test]
    fn overhead_worklist_lists_balanced_before_unbalanced() {
        let feeder = TestFeeder::new()
            .section("U1", "SRC", "A", 10.0, OverheadLineUnbalanced, &[("LineID", "DEFAULT")])
            .section("O1", "A", "B", 10.0, OverheadLine, &[("LineID", "DEFAULT")])
            .build();
        let index =
            ConductorIndex::build(&feeder, &default_categories(), &PlaceholderSet::default())
                .unwrap();
        let order: Vec<&str> = index
            .worklist(Worklist::Overhead)
            .iter()
            .map(|d| d.section.as_str())
            .collect();
        assert_eq!(order, vec!["O1", "U1"]);
    }

    #[test]
    fn first_registered_category_governs_section() {
        let mut builder = TestFeeder::new().section(
            "S1",
            "SRC",
            "A",
            10.0,
            Underground,
            &[("CableID", "DEFAULT")],
        );
        builder = builder.extra_device("S1", OverheadLine, &[("LineID", "336AL")]);
        let feeder = builder.build();

        let index =
            ConductorIndex::build(&feeder, &default_categories(), &PlaceholderSet::default())
                .unwrap();
        let governing = index.get(&SectionId::new("S1")).unwrap();
        assert_eq!(governing.category, OverheadLine);
        assert_eq!(index.shadowed(), 1);
        assert_eq!(index.pending(), 0);
    }

    #[test]
    fn duplicate_records_in_same_category_first_wins() {
        let feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 10.0, OverheadLine, &[("LineID", "336AL")])
            .extra_device("S1", OverheadLine, &[("LineID", "DEFAULT")])
            .build();
        let index =
            ConductorIndex::build(&feeder, &default_categories(), &PlaceholderSet::default())
                .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.pending(), 0);
    }

    #[test]
    fn categories_missing_from_table_are_not_indexed() {
        let feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 10.0, Underground, &[("CableID", "DEFAULT")])
            .build();
        let table: Vec<CategorySpec> = default_categories()
            .into_iter()
            .filter(|spec| spec.category != Underground)
            .collect();
        let index = ConductorIndex::build(&feeder, &table, &PlaceholderSet::default()).unwrap();
        assert!(index.is_empty());
    }
}
