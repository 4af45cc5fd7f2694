//! On-disk study schema.
//!
//! ```toml
//! [[networks]]
//! id = "FDR-12"
//! source = "SRC"
//!
//! [[networks.nodes]]
//! id = "N1"
//! load_kva = 45.0
//!
//! [[networks.sections]]
//! id = "S1"
//! from = "SRC"
//! to = "N1"
//! downstream_kva = 310.0   # optional
//!
//! [[networks.devices]]
//! number = 1
//! section = "S1"
//! category = "overhead_line"
//! attributes = { LineID = "336AL" }
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use feederfix_core::{ConductorCategory, Feeder, Study};
use serde::{Deserialize, Serialize};

use super::format::Format;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyFile {
    #[serde(default)]
    pub networks: Vec<NetworkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub load_kva: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream_kva: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub number: usize,
    pub section: String,
    pub category: ConductorCategory,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl StudyFile {
    pub fn parse(raw: &str, format: Format) -> Result<Self> {
        match format {
            Format::Toml => toml::from_str(raw).context("parsing TOML study"),
            Format::Json => serde_json::from_str(raw).context("parsing JSON study"),
        }
    }

    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Toml => toml::to_string_pretty(self).context("encoding TOML study"),
            Format::Json => serde_json::to_string_pretty(self).context("encoding JSON study"),
        }
    }

    /// Snapshot a loaded study, including any attribute values written since
    /// it was loaded.
    pub fn from_study(study: &Study) -> Self {
        Self {
            networks: study.feeders().iter().map(NetworkRecord::from_feeder).collect(),
        }
    }
}

impl NetworkRecord {
    pub fn from_feeder(feeder: &Feeder) -> Self {
        Self {
            id: feeder.id.clone(),
            source: feeder.source.to_string(),
            nodes: feeder
                .nodes()
                .map(|node| NodeRecord {
                    id: node.id.to_string(),
                    load_kva: node.load.value(),
                })
                .collect(),
            sections: feeder
                .sections()
                .map(|section| SectionRecord {
                    id: section.id.to_string(),
                    from: section.from_node.to_string(),
                    to: section.to_node.to_string(),
                    downstream_kva: section.downstream_override.map(|kva| kva.value()),
                })
                .collect(),
            devices: feeder
                .devices()
                .iter()
                .map(|device| DeviceRecord {
                    number: device.id.value(),
                    section: device.section.to_string(),
                    category: device.category,
                    attributes: device.attributes.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[networks]]
        id = "FDR-1"
        source = "SRC"

        [[networks.nodes]]
        id = "SRC"

        [[networks.nodes]]
        id = "N1"
        load_kva = 45.0

        [[networks.sections]]
        id = "S1"
        from = "SRC"
        to = "N1"

        [[networks.devices]]
        number = 1
        section = "S1"
        category = "overhead_by_phase"
        attributes = { PhaseConductorIDA = "1/0AL", NeutralConductorID1 = "DEFAULT" }
    "#;

    #[test]
    fn parses_toml_schema() {
        let file = StudyFile::parse(SAMPLE, Format::Toml).unwrap();
        let network = &file.networks[0];
        assert_eq!(network.nodes[0].load_kva, 0.0);
        assert_eq!(network.nodes[1].load_kva, 45.0);
        assert_eq!(network.sections[0].downstream_kva, None);
        assert_eq!(network.devices[0].category, ConductorCategory::OverheadByPhase);
        assert_eq!(network.devices[0].attributes["NeutralConductorID1"], "DEFAULT");
    }

    #[test]
    fn json_and_toml_agree() {
        let file = StudyFile::parse(SAMPLE, Format::Toml).unwrap();
        let json = file.render(Format::Json).unwrap();
        assert_eq!(StudyFile::parse(&json, Format::Json).unwrap(), file);
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        let raw = r#"{"networks":[{"id":"F","source":"SRC","devices":[
            {"number":1,"section":"S1","category":"overhead"}]}]}"#;
        assert!(StudyFile::parse(raw, Format::Json).is_err());
    }
}
