//! # feederfix-algo: Conductor Attribute Resolution
//!
//! Fills placeholder conductor ids ("DEFAULT", "N/A", ...) on feeder sections
//! by borrowing values from nearby sections of the same conductor family.
//!
//! ## Pipeline
//!
//! | Stage | Item |
//! |-------|------|
//! | Placeholder test | [`PlaceholderSet`] |
//! | Section index and worklists | [`ConductorIndex`] |
//! | Bounded directional walk | [`DirectionalTraversal`] |
//! | Load similarity | [`LoadSimilarityGate`] |
//! | Candidate collection | [`Accumulator`] |
//! | Upstream/downstream reconciliation | [`decide`], [`resolve_device`] |
//! | First pass and refinement | [`resolve_conductors`] |
//! | Report tables | [`changed_table`], [`input_required_table`] |
//!
//! The resolver writes fixes into the network as it goes, so a section fixed
//! early in a pass is usable evidence for every section resolved after it.
//!
//! ## Example
//!
//! ```rust
//! use feederfix_algo::{resolve_conductors, test_utils::TestFeeder, ResolverConfig};
//! use feederfix_core::ConductorCategory::OverheadLine;
//!
//! let mut feeder = TestFeeder::new()
//!     .section("S1", "SRC", "A", 100.0, OverheadLine, &[("LineID", "336AL")])
//!     .section("S2", "A", "B", 98.0, OverheadLine, &[("LineID", "DEFAULT")])
//!     .build();
//!
//! let report = resolve_conductors(&mut feeder, &ResolverConfig::default()).unwrap();
//! assert_eq!(report.changed[0].new, "336AL");
//! assert!(report.input_required.is_empty());
//! ```

pub mod accumulate;
pub mod candidate;
pub mod classifier;
pub mod config;
pub mod index;
pub mod policy;
pub mod records;
pub mod report;
pub mod resolver;
pub mod similarity;
pub mod test_utils;
pub mod traversal;

pub use accumulate::{Accumulation, Accumulator};
pub use candidate::{Candidate, CandidateSet, CANNOT_ASSIGN, NOT_FOUND};
pub use classifier::PlaceholderSet;
pub use config::{default_categories, CategorySpec, ResolverConfig, Worklist};
pub use index::{needs_resolution, ConductorIndex};
pub use policy::{decide, resolve_device, Decision, DeviceOutcome, ResolutionContext, Rule};
pub use records::{composite_key, ChangeRecord, Ledger, UnresolvedRecord};
pub use report::{changed_table, input_required_table, ReportRow, ReportTable};
pub use resolver::{resolve_conductors, resolve_study, ResolutionReport, ResolutionStats};
pub use similarity::LoadSimilarityGate;
pub use traversal::{traverse, DirectionalTraversal};
