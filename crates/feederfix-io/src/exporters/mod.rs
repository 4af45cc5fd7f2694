//! Resolution report export.
//!
//! CSV output mirrors the two report tables one-to-one: a header row followed
//! by the table cells, in report order. JSON output carries both tables plus
//! the run counters.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use feederfix_algo::{ReportTable, ResolutionReport, ResolutionStats};
use serde::Serialize;

pub const CHANGED_CSV: &str = "changed.csv";
pub const INPUT_REQUIRED_CSV: &str = "input_required.csv";

/// Write `changed.csv` and `input_required.csv` into `dir`, creating it if
/// needed. Returns the written paths.
pub fn write_report_csv(dir: impl AsRef<Path>, report: &ResolutionReport) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating report directory '{}'", dir.display()))?;

    let mut written = Vec::with_capacity(2);
    for (name, table) in [
        (CHANGED_CSV, report.changed_table()),
        (INPUT_REQUIRED_CSV, report.input_required_table()),
    ] {
        let path = dir.join(name);
        write_table_csv(&path, &table)?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_table_csv(path: &Path, table: &ReportTable) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating CSV file '{}'", path.display()))?;
    let mut writer = Writer::from_writer(file);
    writer
        .write_record(&table.headers)
        .context("writing CSV header")?;
    for row in &table.rows {
        writer
            .write_record(&row.cells)
            .with_context(|| format!("writing CSV row '{}'", row.key))?;
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    stats: &'a ResolutionStats,
    changed: ReportTable,
    input_required: ReportTable,
}

pub fn report_to_json(report: &ResolutionReport) -> Result<serde_json::Value> {
    let document = ReportDocument {
        stats: &report.stats,
        changed: report.changed_table(),
        input_required: report.input_required_table(),
    };
    serde_json::to_value(document).context("encoding report as JSON")
}
