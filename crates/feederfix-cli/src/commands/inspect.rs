//! Read-only summary of a study: how many conductor devices each category
//! has and how many of them currently hold a placeholder.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use feederfix_algo::{needs_resolution, ConductorIndex, ResolverConfig};
use feederfix_core::{ConductorCategory, FeederResult, NetworkModel};
use feederfix_io::load_study_with;
use tabwriter::TabWriter;

use super::load_config;

#[derive(Debug, Default, PartialEq)]
struct CategoryCounts {
    devices: usize,
    governing: usize,
    needs_resolution: usize,
}

pub fn handle(study_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let result = load_study_with(study_path, &config.categories)?;

    let mut writer = TabWriter::new(io::stdout());
    for feeder in result.study.feeders() {
        let rows = category_counts(feeder, &config)
            .with_context(|| format!("inspecting feeder '{}'", feeder.id))?;
        writeln!(writer, "Feeder {}: {}", feeder.id, feeder.stats())?;
        writeln!(writer, "CATEGORY\tDEVICES\tGOVERNING\tNEEDS RESOLUTION")?;
        for (category, counts) in rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                category, counts.devices, counts.governing, counts.needs_resolution
            )?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "Diagnostics: {}", result.diagnostics.summary())?;
    writer.flush()?;
    Ok(())
}

/// Only governing devices are checked for placeholders; shadowed records
/// are never resolved.
fn category_counts<N: NetworkModel>(
    model: &N,
    config: &ResolverConfig,
) -> FeederResult<Vec<(ConductorCategory, CategoryCounts)>> {
    let placeholders = config.placeholder_set();
    let index = ConductorIndex::build(model, &config.categories, &placeholders)?;

    let mut rows = Vec::with_capacity(config.categories.len());
    for spec in &config.categories {
        let mut counts = CategoryCounts::default();
        for device in model.list_devices(spec.category) {
            counts.devices += 1;
            if index.get(&device.section) != Some(&device) {
                continue;
            }
            counts.governing += 1;
            if needs_resolution(model, &device, &spec.attributes, &placeholders)? {
                counts.needs_resolution += 1;
            }
        }
        rows.push((spec.category, counts));
    }
    Ok(rows)
}
