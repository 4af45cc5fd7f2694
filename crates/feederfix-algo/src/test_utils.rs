//! Small feeder builder for resolver tests.

use feederfix_core::{ConductorCategory, ConductorDevice, Feeder, NetNode, NodeId, Section};

pub struct TestFeeder {
    feeder: Feeder,
    next_device: usize,
}

impl TestFeeder {
    /// Empty feeder with a source node named `SRC`.
    pub fn new() -> Self {
        let mut feeder = Feeder::new("TEST", NodeId::new("SRC"));
        feeder
            .add_node(NetNode::new("SRC"))
            .expect("fresh feeder accepts the source node");
        Self {
            feeder,
            next_device: 1,
        }
    }

    fn ensure_node(&mut self, id: &str) {
        if self.feeder.node_index(&NodeId::new(id)).is_err() {
            self.feeder
                .add_node(NetNode::new(id))
                .expect("node was checked to be new");
        }
    }

    /// Section `from -> to` with a fixed downstream load and one conductor
    /// device.
    pub fn section(
        mut self,
        id: &str,
        from: &str,
        to: &str,
        downstream_kva: f64,
        category: ConductorCategory,
        attributes: &[(&str, &str)],
    ) -> Self {
        self = self.bare_section(id, from, to, downstream_kva);
        self.extra_device(id, category, attributes)
    }

    /// Section without any conductor device (a switch, a transformer, ...).
    pub fn bare_section(mut self, id: &str, from: &str, to: &str, downstream_kva: f64) -> Self {
        self.ensure_node(from);
        self.ensure_node(to);
        self.feeder
            .add_section(Section::new(id, from, to).with_downstream_kva(downstream_kva))
            .expect("test section is valid");
        self
    }

    /// Another device record on an existing section.
    pub fn extra_device(
        mut self,
        section: &str,
        category: ConductorCategory,
        attributes: &[(&str, &str)],
    ) -> Self {
        let mut device = ConductorDevice::new(self.next_device, section, category);
        for (name, value) in attributes {
            device = device.with_attribute(*name, *value);
        }
        self.next_device += 1;
        self.feeder
            .add_device(device)
            .expect("test device references an existing section");
        self
    }

    pub fn build(mut self) -> Feeder {
        self.feeder.finalize();
        self.feeder
    }
}

impl Default for TestFeeder {
    fn default() -> Self {
        Self::new()
    }
}
