//! Turns a [`NetworkRecord`] into a validated [`Feeder`].
//!
//! Structural problems (dangling references, duplicate ids, an undeclared
//! source, negative or non-finite loads) are hard errors. Data smells the resolver can live with are
//! recorded as warnings:
//!
//! - a conductor record on a section that another record already governs
//!   (governance follows the category table first, then file order, exactly
//!   as the resolver's index assigns it);
//! - a device missing one of its category's conductor attributes (it reads as
//!   empty and counts as concrete);
//! - a conductor section whose downstream load is zero (nothing is ever
//!   load-similar to it).

use std::collections::HashMap;

use feederfix_algo::CategorySpec;
use feederfix_core::{
    ConductorDevice, DeviceRef, Diagnostics, Feeder, FeederError, FeederResult, NetNode,
    NetworkModel, NodeId, Section, SectionId,
};

use crate::importers::study_file::NetworkRecord;

pub struct FeederBuilder<'a> {
    categories: &'a [CategorySpec],
}

impl<'a> FeederBuilder<'a> {
    pub fn new(categories: &'a [CategorySpec]) -> Self {
        Self { categories }
    }

    pub fn build(&self, record: &NetworkRecord, diag: &mut Diagnostics) -> FeederResult<Feeder> {
        let mut feeder = Feeder::new(record.id.clone(), NodeId::new(record.source.as_str()));

        for node in &record.nodes {
            if !node.load_kva.is_finite() || node.load_kva < 0.0 {
                return Err(FeederError::Validation(format!(
                    "node '{}' in feeder '{}' has invalid load {}",
                    node.id, record.id, node.load_kva
                )));
            }
            feeder.add_node(NetNode::new(node.id.as_str()).with_load_kva(node.load_kva))?;
        }
        if feeder.node_index(&feeder.source).is_err() {
            return Err(FeederError::Validation(format!(
                "source node '{}' of feeder '{}' is not declared",
                record.source, record.id
            )));
        }

        for section in &record.sections {
            for endpoint in [&section.from, &section.to] {
                if feeder.node_index(&NodeId::new(endpoint.as_str())).is_err() {
                    return Err(FeederError::Validation(format!(
                        "section '{}' references undeclared node '{}'",
                        section.id, endpoint
                    )));
                }
            }
            let mut built = Section::new(section.id.as_str(), section.from.as_str(), section.to.as_str());
            if let Some(kva) = section.downstream_kva {
                if !kva.is_finite() || kva < 0.0 {
                    return Err(FeederError::Validation(format!(
                        "section '{}' in feeder '{}' has invalid downstream load {}",
                        section.id, record.id, kva
                    )));
                }
                built = built.with_downstream_kva(kva);
            }
            feeder.add_section(built)?;
        }

        for device in &record.devices {
            let mut built = ConductorDevice::new(device.number, device.section.as_str(), device.category);
            built.attributes = device.attributes.clone();
            let handle = feeder.add_device(built)?;

            if let Some(spec) = self.categories.iter().find(|spec| spec.category == device.category) {
                for attribute in &spec.attributes {
                    if !device.attributes.contains_key(attribute) {
                        diag.warn(
                            "attribute",
                            format!("Section {}", handle.section),
                            format!("device {} has no {attribute}", handle.device),
                        );
                    }
                }
            }
        }

        feeder.finalize();
        self.warn_shadowed(&feeder, diag);

        for device in feeder.devices() {
            let handle = device.handle();
            if feeder.downstream_load(&handle)? == 0.0 {
                diag.warn(
                    "load",
                    format!("Section {}", handle.section),
                    "zero downstream load; no neighbor will be load-similar",
                );
            }
        }

        Ok(feeder)
    }

    fn warn_shadowed(&self, feeder: &Feeder, diag: &mut Diagnostics) {
        let mut governing: HashMap<SectionId, DeviceRef> = HashMap::new();
        for spec in self.categories {
            for device in feeder.list_devices(spec.category) {
                match governing.get(&device.section) {
                    Some(owner) => diag.warn(
                        "duplicate",
                        format!("Section {}", device.section),
                        format!(
                            "device {} ({}) is ignored; device {} ({}) governs this section",
                            device.device, device.category, owner.device, owner.category
                        ),
                    ),
                    None => {
                        governing.insert(device.section.clone(), device);
                    }
                }
            }
        }
    }
}
