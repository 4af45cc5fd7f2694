//! # feederfix-io: Study Files and Report Export
//!
//! Reads feeder studies from TOML or JSON, validates them into
//! [`feederfix_core::Feeder`] graphs, writes resolved studies back out, and
//! exports resolution reports as CSV or JSON.
//!
//! ## Supported Formats
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | TOML study | `.toml` | Hand-editable |
//! | JSON study | `.json` | Same schema, for tooling |
//!
//! ## Error Handling
//!
//! Everything here returns `anyhow::Result` with file and feeder context
//! attached. Structural problems in a study abort the load; data smells are
//! collected as [`feederfix_core::Diagnostics`] warnings in the
//! [`ImportResult`].
//!
//! ## Module Overview
//!
//! - [`importers`] - format detection, study schema, [`load_study`], [`save_study`]
//! - [`helpers`] - [`helpers::FeederBuilder`] and [`ImportResult`]
//! - [`exporters`] - [`write_report_csv`], [`report_to_json`]

pub mod exporters;
pub mod helpers;
pub mod importers;

pub use exporters::{report_to_json, write_report_csv};
pub use helpers::ImportResult;
pub use importers::{load_study, load_study_with, save_study, Format};
