//! Study file import and export.
//!
//! ```no_run
//! use feederfix_io::importers::load_study;
//!
//! let result = load_study("feeder.toml")?;
//! println!("{} feeder(s), {}", result.study.len(), result.diagnostics.summary());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod format;
pub mod study_file;

pub use format::{Format, FormatError};
pub use study_file::{DeviceRecord, NetworkRecord, NodeRecord, SectionRecord, StudyFile};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use feederfix_algo::{default_categories, CategorySpec};
use feederfix_core::{Diagnostics, Study};
use tracing::{debug, warn};

use crate::helpers::{FeederBuilder, ImportResult};

/// Load a study, checking conductor attributes against the default category
/// table.
pub fn load_study(path: impl AsRef<Path>) -> Result<ImportResult> {
    load_study_with(path, &default_categories())
}

/// Load a study, checking conductor attributes against `categories`.
pub fn load_study_with(path: impl AsRef<Path>, categories: &[CategorySpec]) -> Result<ImportResult> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading study file '{}'", path.display()))?;
    let file = StudyFile::parse(&raw, format)
        .with_context(|| format!("loading {} '{}'", format, path.display()))?;
    build_study(&file, categories)
}

/// Validate every network in `file` and assemble the study.
pub fn build_study(file: &StudyFile, categories: &[CategorySpec]) -> Result<ImportResult> {
    let builder = FeederBuilder::new(categories);
    let mut diagnostics = Diagnostics::new();
    let mut study = Study::new();
    for record in &file.networks {
        let feeder = builder
            .build(record, &mut diagnostics)
            .with_context(|| format!("building feeder '{}'", record.id))?;
        debug!(feeder = %feeder.id, stats = %feeder.stats(), "feeder loaded");
        study.push(feeder);
    }
    for issue in &diagnostics.issues {
        warn!("{issue}");
    }
    Ok(ImportResult { study, diagnostics })
}

/// Write `study` back out, in the format implied by the extension of `path`.
pub fn save_study(path: impl AsRef<Path>, study: &Study) -> Result<()> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    let rendered = StudyFile::from_study(study).render(format)?;
    fs::write(path, rendered).with_context(|| format!("writing study file '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feederfix_algo::{resolve_study, ResolverConfig};
    use feederfix_core::{ConductorCategory, NetworkModel};

    const STUDY: &str = r#"
        [[networks]]
        id = "FDR-7"
        source = "SRC"
        nodes = [
            { id = "SRC" },
            { id = "N1", load_kva = 10.0 },
            { id = "N2", load_kva = 90.0 },
        ]
        sections = [
            { id = "S1", from = "SRC", to = "N1" },
            { id = "S2", from = "N1", to = "N2" },
        ]
        devices = [
            { number = 1, section = "S1", category = "overhead_line", attributes = { LineID = "336AL" } },
            { number = 2, section = "S2", category = "overhead_line", attributes = { LineID = "DEFAULT" } },
        ]
    "#;

    #[test]
    fn load_resolve_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feeder.toml");
        fs::write(&input, STUDY).unwrap();

        let ImportResult { mut study, diagnostics } = load_study(&input).unwrap();
        assert!(diagnostics.issues.is_empty());
        assert_eq!(study.len(), 1);

        // S1 carries 100 kVA downstream and S2 carries 90, so they are not
        // load-similar. S1 is still the only evidence and gets adopted.
        let report = resolve_study(&mut study, &ResolverConfig::default()).unwrap();
        assert_eq!(report.changed.len(), 1);

        let output = dir.path().join("resolved.json");
        save_study(&output, &study).unwrap();
        let reloaded = load_study(&output).unwrap().study;
        let feeder = reloaded.single_feeder().unwrap();
        let s2 = &feeder.list_devices(ConductorCategory::OverheadLine)[1];
        assert_eq!(feeder.attribute(s2, "LineID").unwrap(), "336AL");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("feeder.yaml");
        fs::write(&input, STUDY).unwrap();
        let err = load_study(&input).unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn build_errors_name_the_feeder() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.toml");
        fs::write(&input, STUDY.replace("to = \"N2\"", "to = \"N9\"")).unwrap();
        let err = load_study(&input).unwrap_err();
        assert!(format!("{err:#}").contains("FDR-7"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_study("/nonexistent/feeder.toml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/feeder.toml"));
    }
}
