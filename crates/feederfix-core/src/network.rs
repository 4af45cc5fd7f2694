use crate::graph_utils::{aggregate_downstream_loads, DirectionalWalk};
use crate::{
    ConductorCategory, ConductorDevice, DeviceId, DeviceRef, Direction, FeederError, FeederResult,
    KiloVoltAmperes, NetNode, NetworkModel, NodeId, Section, SectionId,
};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeMap, HashMap};

// A feeder is a directed graph oriented source -> loads. Upstream walks follow
// incoming edges, downstream walks follow outgoing edges, and a section's
// downstream load is everything reachable from its to-node.

/// One loaded distribution network.
#[derive(Debug, Clone)]
pub struct Feeder {
    pub id: String,
    pub source: NodeId,
    graph: DiGraph<NetNode, SectionId>,
    nodes: HashMap<NodeId, NodeIndex>,
    sections: HashMap<SectionId, (EdgeIndex, Section)>,
    section_order: Vec<SectionId>,
    devices: Vec<ConductorDevice>,
    device_index: HashMap<DeviceId, usize>,
    downstream: Option<HashMap<EdgeIndex, KiloVoltAmperes>>,
}

impl Feeder {
    pub fn new(id: impl Into<String>, source: NodeId) -> Self {
        Self {
            id: id.into(),
            source,
            graph: DiGraph::new(),
            nodes: HashMap::new(),
            sections: HashMap::new(),
            section_order: Vec::new(),
            devices: Vec::new(),
            device_index: HashMap::new(),
            downstream: None,
        }
    }

    pub fn add_node(&mut self, node: NetNode) -> FeederResult<NodeIndex> {
        if self.nodes.contains_key(&node.id) {
            return Err(FeederError::Validation(format!(
                "duplicate node '{}' in feeder '{}'",
                node.id, self.id
            )));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.nodes.insert(id, idx);
        self.downstream = None;
        Ok(idx)
    }

    pub fn add_section(&mut self, section: Section) -> FeederResult<EdgeIndex> {
        if self.sections.contains_key(&section.id) {
            return Err(FeederError::Validation(format!(
                "duplicate section '{}' in feeder '{}'",
                section.id, self.id
            )));
        }
        let from = self.node_index(&section.from_node)?;
        let to = self.node_index(&section.to_node)?;
        let edge = self.graph.add_edge(from, to, section.id.clone());
        self.section_order.push(section.id.clone());
        self.sections.insert(section.id.clone(), (edge, section));
        self.downstream = None;
        Ok(edge)
    }

    /// Register a conductor device. Several devices may share a section;
    /// device numbers must be unique.
    pub fn add_device(&mut self, device: ConductorDevice) -> FeederResult<DeviceRef> {
        if !self.sections.contains_key(&device.section) {
            return Err(FeederError::Validation(format!(
                "device {} references unknown section '{}'",
                device.id, device.section
            )));
        }
        if self.device_index.contains_key(&device.id) {
            return Err(FeederError::Validation(format!(
                "duplicate device number {} in feeder '{}'",
                device.id, self.id
            )));
        }
        let handle = device.handle();
        self.device_index.insert(device.id, self.devices.len());
        self.devices.push(device);
        Ok(handle)
    }

    /// Precompute downstream loads for every section.
    pub fn finalize(&mut self) {
        self.downstream = Some(aggregate_downstream_loads(&self.graph));
    }

    pub fn node_index(&self, node: &NodeId) -> FeederResult<NodeIndex> {
        self.nodes
            .get(node)
            .copied()
            .ok_or_else(|| FeederError::Network(format!("unknown node '{node}'")))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NetNode> {
        self.graph.node_weights()
    }

    /// Sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.section_order
            .iter()
            .filter_map(|id| self.sections.get(id).map(|(_, section)| section))
    }

    pub fn section(&self, id: &SectionId) -> FeederResult<&Section> {
        self.sections
            .get(id)
            .map(|(_, section)| section)
            .ok_or_else(|| FeederError::Network(format!("unknown section '{id}'")))
    }

    /// Devices in declaration order.
    pub fn devices(&self) -> &[ConductorDevice] {
        &self.devices
    }

    pub fn device(&self, id: DeviceId) -> FeederResult<&ConductorDevice> {
        self.device_index
            .get(&id)
            .map(|&slot| &self.devices[slot])
            .ok_or_else(|| FeederError::Network(format!("unknown device {id}")))
    }

    fn device_mut(&mut self, id: DeviceId) -> FeederResult<&mut ConductorDevice> {
        match self.device_index.get(&id) {
            Some(&slot) => Ok(&mut self.devices[slot]),
            None => Err(FeederError::Network(format!("unknown device {id}"))),
        }
    }

    fn section_load(&self, edge: EdgeIndex) -> KiloVoltAmperes {
        if let Some(cached) = self.downstream.as_ref().and_then(|loads| loads.get(&edge)) {
            return *cached;
        }
        let mut total = KiloVoltAmperes(0.0);
        if let Some((_, target)) = self.graph.edge_endpoints(edge) {
            let mut dfs = Dfs::new(&self.graph, target);
            while let Some(node) = dfs.next(&self.graph) {
                total = total + self.graph[node].load;
            }
        }
        total
    }

    pub fn stats(&self) -> NetworkStats {
        let mut devices_by_category = BTreeMap::new();
        for device in &self.devices {
            *devices_by_category.entry(device.category).or_insert(0) += 1;
        }
        NetworkStats {
            num_nodes: self.graph.node_count(),
            num_sections: self.graph.edge_count(),
            num_devices: self.devices.len(),
            devices_by_category,
            total_load: self.graph.node_weights().map(|node| node.load).sum(),
        }
    }
}

impl NetworkModel for Feeder {
    fn list_devices(&self, category: ConductorCategory) -> Vec<DeviceRef> {
        self.devices
            .iter()
            .filter(|device| device.category == category)
            .map(ConductorDevice::handle)
            .collect()
    }

    fn section_endpoints(&self, section: &SectionId) -> FeederResult<(NodeId, NodeId)> {
        let section = self.section(section)?;
        Ok((section.from_node.clone(), section.to_node.clone()))
    }

    fn attribute(&self, device: &DeviceRef, name: &str) -> FeederResult<String> {
        let device = self.device(device.device)?;
        Ok(device.attributes.get(name).cloned().unwrap_or_default())
    }

    fn set_attribute(&mut self, device: &DeviceRef, name: &str, value: &str) -> FeederResult<()> {
        let device = self.device_mut(device.device)?;
        device.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn downstream_load(&self, device: &DeviceRef) -> FeederResult<f64> {
        let (edge, section) = self
            .sections
            .get(&device.section)
            .ok_or_else(|| FeederError::Network(format!("unknown section '{}'", device.section)))?;
        let load = section
            .downstream_override
            .unwrap_or_else(|| self.section_load(*edge));
        Ok(load.value())
    }

    fn walk<'a>(
        &'a self,
        node: &NodeId,
        direction: Direction,
    ) -> FeederResult<Box<dyn Iterator<Item = (SectionId, usize)> + 'a>> {
        let start = self.node_index(node)?;
        Ok(Box::new(DirectionalWalk::new(&self.graph, start, direction)))
    }
}

/// Summary counts for a feeder.
#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub num_nodes: usize,
    pub num_sections: usize,
    pub num_devices: usize,
    pub devices_by_category: BTreeMap<ConductorCategory, usize>,
    pub total_load: KiloVoltAmperes,
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nodes, {} sections, {} conductor devices, {} connected",
            self.num_nodes, self.num_sections, self.num_devices, self.total_load
        )
    }
}

/// The set of networks currently loaded. The resolver works on exactly one.
#[derive(Debug, Clone, Default)]
pub struct Study {
    feeders: Vec<Feeder>,
}

impl Study {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_feeders(feeders: Vec<Feeder>) -> Self {
        Self { feeders }
    }

    pub fn push(&mut self, feeder: Feeder) {
        self.feeders.push(feeder);
    }

    pub fn len(&self) -> usize {
        self.feeders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeders.is_empty()
    }

    pub fn feeders(&self) -> &[Feeder] {
        &self.feeders
    }

    fn check_single(&self) -> FeederResult<()> {
        match self.feeders.len() {
            0 => Err(FeederError::Config("no circuit loaded".into())),
            1 => Ok(()),
            n => Err(FeederError::Config(format!(
                "found more than one circuit ({n} loaded)"
            ))),
        }
    }

    /// The only loaded feeder; zero or several loaded is a configuration error.
    pub fn single_feeder(&self) -> FeederResult<&Feeder> {
        self.check_single()?;
        Ok(&self.feeders[0])
    }

    pub fn single_feeder_mut(&mut self) -> FeederResult<&mut Feeder> {
        self.check_single()?;
        Ok(&mut self.feeders[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Feeder {
        let mut feeder = Feeder::new("FDR-1", NodeId::new("SRC"));
        for (id, kva) in [("SRC", 0.0), ("A", 10.0), ("B", 15.0)] {
            feeder.add_node(NetNode::new(id).with_load_kva(kva)).unwrap();
        }
        feeder.add_section(Section::new("S1", "SRC", "A")).unwrap();
        feeder
            .add_section(Section::new("S2", "A", "B").with_downstream_kva(99.0))
            .unwrap();
        feeder
            .add_device(
                ConductorDevice::new(1, "S1", ConductorCategory::OverheadLine)
                    .with_attribute("LineID", "DEFAULT"),
            )
            .unwrap();
        feeder
            .add_device(
                ConductorDevice::new(2, "S2", ConductorCategory::Underground)
                    .with_attribute("CableID", "1/0AL"),
            )
            .unwrap();
        feeder
    }

    #[test]
    fn rejects_unknown_references() {
        let mut feeder = sample();
        assert!(matches!(
            feeder.add_section(Section::new("S3", "B", "Z")),
            Err(FeederError::Network(_))
        ));
        assert!(matches!(
            feeder.add_device(ConductorDevice::new(3, "S9", ConductorCategory::OverheadLine)),
            Err(FeederError::Validation(_))
        ));
        assert!(matches!(
            feeder.add_device(ConductorDevice::new(1, "S2", ConductorCategory::OverheadLine)),
            Err(FeederError::Validation(_))
        ));
    }

    #[test]
    fn allows_several_devices_on_one_section() {
        let mut feeder = sample();
        feeder
            .add_device(ConductorDevice::new(3, "S1", ConductorCategory::Underground))
            .unwrap();
        assert_eq!(feeder.list_devices(ConductorCategory::Underground).len(), 2);
    }

    #[test]
    fn attributes_read_and_write_through() {
        let mut feeder = sample();
        let device = feeder.list_devices(ConductorCategory::OverheadLine)[0].clone();
        assert_eq!(feeder.attribute(&device, "LineID").unwrap(), "DEFAULT");
        assert_eq!(feeder.attribute(&device, "Missing").unwrap(), "");
        feeder.set_attribute(&device, "LineID", "336AL").unwrap();
        assert_eq!(feeder.attribute(&device, "LineID").unwrap(), "336AL");
    }

    #[test]
    fn downstream_load_prefers_override() {
        let mut feeder = sample();
        feeder.finalize();
        let oh = feeder.list_devices(ConductorCategory::OverheadLine)[0].clone();
        let ug = feeder.list_devices(ConductorCategory::Underground)[0].clone();
        assert_eq!(feeder.downstream_load(&oh).unwrap(), 25.0);
        assert_eq!(feeder.downstream_load(&ug).unwrap(), 99.0);
    }

    #[test]
    fn downstream_load_without_finalize() {
        let feeder = sample();
        let oh = feeder.list_devices(ConductorCategory::OverheadLine)[0].clone();
        assert_eq!(feeder.downstream_load(&oh).unwrap(), 25.0);
    }

    #[test]
    fn walk_from_unknown_node_fails() {
        let feeder = sample();
        assert!(feeder
            .walk(&NodeId::new("nowhere"), Direction::Upstream)
            .is_err());
    }

    #[test]
    fn study_requires_exactly_one_feeder() {
        let mut study = Study::new();
        assert!(matches!(
            study.single_feeder_mut(),
            Err(FeederError::Config(msg)) if msg.contains("no circuit")
        ));
        study.push(sample());
        assert!(study.single_feeder().is_ok());
        study.push(sample());
        assert!(matches!(
            study.single_feeder(),
            Err(FeederError::Config(msg)) if msg.contains("more than one")
        ));
    }

    #[test]
    fn stats_count_devices_per_category() {
        let stats = sample().stats();
        assert_eq!(stats.num_nodes, 3);
        assert_eq!(stats.num_sections, 2);
        assert_eq!(stats.devices_by_category[&ConductorCategory::OverheadLine], 1);
        assert_eq!(stats.total_load.value(), 25.0);
    }
}
