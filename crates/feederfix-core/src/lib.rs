//! # feederfix-core: Radial Feeder Network Model
//!
//! Provides the data structures the conductor resolver reads and writes: network
//! nodes, sections (edges), the conductor devices that sit on sections, and a
//! graph-backed [`Feeder`] that can be walked upstream or downstream.
//!
//! ## Design Philosophy
//!
//! A feeder is modeled as a **directed graph** oriented from the source toward
//! the loads:
//! - **Nodes**: electrical nodes with an optional spot load (kVA)
//! - **Edges**: sections, keyed by [`SectionId`]
//!
//! Conductor devices are stored beside the graph rather than inside it. A
//! section may carry several device records (bad imports do this); the
//! resolver decides which one governs the section.
//!
//! ## Quick Start
//!
//! ```rust
//! use feederfix_core::*;
//!
//! let mut feeder = Feeder::new("FDR-1", NodeId::new("SRC"));
//! feeder.add_node(NetNode::new("SRC")).unwrap();
//! feeder.add_node(NetNode::new("N1").with_load_kva(25.0)).unwrap();
//! feeder.add_section(Section::new("S1", "SRC", "N1")).unwrap();
//! feeder
//!     .add_device(
//!         ConductorDevice::new(1, "S1", ConductorCategory::OverheadLine)
//!             .with_attribute("LineID", "336AL"),
//!     )
//!     .unwrap();
//! feeder.finalize();
//!
//! let device = &feeder.list_devices(ConductorCategory::OverheadLine)[0];
//! assert_eq!(feeder.attribute(device, "LineID").unwrap(), "336AL");
//! assert_eq!(feeder.downstream_load(device).unwrap(), 25.0);
//! ```
//!
//! ## Modules
//!
//! - [`network`] - [`Feeder`] and [`Study`] containers
//! - [`graph_utils`] - directional walks and downstream load aggregation
//! - [`diagnostics`] - issue collection for imports and validation
//! - [`error`] - unified error type

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod network;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics};
pub use error::{FeederError, FeederResult};
pub use graph_utils::{DirectionalWalk, Direction};
pub use network::{Feeder, NetworkStats, Study};
pub use units::KiloVoltAmperes;

/// Section (edge) identifier as it appears in the source model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

/// Node identifier as it appears in the source model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

/// Device number of a conductor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(usize);

impl SectionId {
    pub fn new(value: impl Into<String>) -> Self {
        SectionId(value.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        NodeId(value.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DeviceId {
    #[inline]
    pub fn new(value: usize) -> Self {
        DeviceId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        SectionId::new(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::new(value)
    }
}

/// Conductor device families. Devices of different families are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConductorCategory {
    /// Overhead line with a single `LineID`
    OverheadLine,
    /// Overhead line described phase by phase
    OverheadByPhase,
    /// Unbalanced overhead line with a single `LineID`
    OverheadLineUnbalanced,
    /// Underground cable
    Underground,
}

impl ConductorCategory {
    /// All categories, in the order devices are registered into the index.
    pub const ALL: [ConductorCategory; 4] = [
        ConductorCategory::OverheadLine,
        ConductorCategory::OverheadByPhase,
        ConductorCategory::OverheadLineUnbalanced,
        ConductorCategory::Underground,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConductorCategory::OverheadLine => "overhead_line",
            ConductorCategory::OverheadByPhase => "overhead_by_phase",
            ConductorCategory::OverheadLineUnbalanced => "overhead_line_unbalanced",
            ConductorCategory::Underground => "underground",
        }
    }
}

impl fmt::Display for ConductorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConductorCategory {
    type Err = FeederError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConductorCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FeederError::Parse(format!("unknown conductor category '{s}'")))
    }
}

/// Network node with its spot load.
#[derive(Debug, Clone, PartialEq)]
pub struct NetNode {
    pub id: NodeId,
    /// Connected load at this node (kVA)
    pub load: KiloVoltAmperes,
}

impl NetNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            load: KiloVoltAmperes(0.0),
        }
    }

    pub fn with_load_kva(mut self, kva: f64) -> Self {
        self.load = KiloVoltAmperes(kva);
        self
    }
}

/// A network branch between two nodes, oriented from source toward loads.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub from_node: NodeId,
    pub to_node: NodeId,
    /// Imported downstream load; overrides the aggregated value when set
    pub downstream_override: Option<KiloVoltAmperes>,
}

impl Section {
    pub fn new(id: impl Into<String>, from_node: impl Into<String>, to_node: impl Into<String>) -> Self {
        Self {
            id: SectionId::new(id),
            from_node: NodeId::new(from_node),
            to_node: NodeId::new(to_node),
            downstream_override: None,
        }
    }

    pub fn with_downstream_kva(mut self, kva: f64) -> Self {
        self.downstream_override = Some(KiloVoltAmperes(kva));
        self
    }
}

/// Conductor device record attached to a section.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorDevice {
    pub id: DeviceId,
    pub section: SectionId,
    pub category: ConductorCategory,
    /// Named conductor attributes (`LineID`, `PhaseConductorIDA`, `CableID`, ...)
    pub attributes: BTreeMap<String, String>,
}

impl ConductorDevice {
    pub fn new(number: usize, section: impl Into<String>, category: ConductorCategory) -> Self {
        Self {
            id: DeviceId::new(number),
            section: SectionId::new(section),
            category,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Handle used by the [`NetworkModel`] accessors.
    pub fn handle(&self) -> DeviceRef {
        DeviceRef {
            device: self.id,
            section: self.section.clone(),
            category: self.category,
        }
    }
}

/// Lightweight handle to a conductor device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceRef {
    pub device: DeviceId,
    pub section: SectionId,
    pub category: ConductorCategory,
}

/// Read/write access to one loaded network.
///
/// This is the seam between the resolver and whatever holds the network. The
/// resolver mutates attributes while it walks the same structure, so
/// implementations must make writes visible to subsequent reads immediately.
pub trait NetworkModel {
    /// Devices of one category, in declaration order.
    fn list_devices(&self, category: ConductorCategory) -> Vec<DeviceRef>;

    /// `(from, to)` nodes of a section.
    fn section_endpoints(&self, section: &SectionId) -> FeederResult<(NodeId, NodeId)>;

    /// Current value of a named attribute. Missing attributes read as "".
    fn attribute(&self, device: &DeviceRef, name: &str) -> FeederResult<String>;

    fn set_attribute(&mut self, device: &DeviceRef, name: &str, value: &str) -> FeederResult<()>;

    /// Aggregate downstream load of the section the device sits on (kVA).
    fn downstream_load(&self, device: &DeviceRef) -> FeederResult<f64>;

    /// Depth-annotated walk starting at `node`.
    fn walk<'a>(
        &'a self,
        node: &NodeId,
        direction: Direction,
    ) -> FeederResult<Box<dyn Iterator<Item = (SectionId, usize)> + 'a>>;
}
