use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use feederfix_algo::{resolve_study, ReportTable, ResolutionReport};
use feederfix_cli::cli::{ReportFormat, ResolverArgs};
use feederfix_io::{load_study_with, report_to_json, save_study, write_report_csv, ImportResult};
use tabwriter::TabWriter;
use tracing::info;

use super::layered_config;

pub fn handle(
    study_path: &Path,
    tuning: &ResolverArgs,
    out: Option<&Path>,
    format: ReportFormat,
    report_dir: Option<&Path>,
) -> Result<()> {
    let config = layered_config(tuning)?;
    let ImportResult {
        mut study,
        diagnostics,
    } = load_study_with(study_path, &config.categories)?;
    if !diagnostics.issues.is_empty() {
        info!("study loaded with {}", diagnostics.summary());
    }

    let report = resolve_study(&mut study, &config)
        .with_context(|| format!("resolving '{}'", study_path.display()))?;
    info!("{}", report.stats);

    match format {
        ReportFormat::Plain => print_plain(&report)?,
        ReportFormat::Json => {
            let json = report_to_json(&report)?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    if let Some(out) = out {
        save_study(out, &study)?;
        info!("updated study written to {}", out.display());
    }
    if let Some(dir) = report_dir {
        for path in write_report_csv(dir, &report)? {
            info!("report written to {}", path.display());
        }
    }
    Ok(())
}

fn print_plain(report: &ResolutionReport) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    write_table(&mut writer, &report.changed_table())?;
    writeln!(writer)?;
    write_table(&mut writer, &report.input_required_table())?;
    writeln!(writer)?;
    writeln!(writer, "Summary: {}", report.stats)?;
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, table: &ReportTable) -> io::Result<()> {
    writeln!(writer, "{} ({})", table.title, table.len())?;
    writeln!(writer, "{}", table.headers.join("\t"))?;
    for row in &table.rows {
        writeln!(writer, "{}", row.cells.join("\t"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feederfix_algo::test_utils::TestFeeder;
    use feederfix_algo::{resolve_conductors, ResolverConfig};
    use feederfix_core::ConductorCategory::*;

    #[test]
    fn plain_table_lists_title_headers_and_cells() {
        let mut feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 100.0, OverheadLine, &[("LineID", "336AL")])
            .section("S2", "A", "B", 95.0, OverheadLine, &[("LineID", "DEFAULT")])
            .build();
        let report = resolve_conductors(&mut feeder, &ResolverConfig::default()).unwrap();

        let mut buffer = Vec::new();
        write_table(&mut buffer, &report.changed_table()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Changed Conductors (1)");
        assert_eq!(lines[1], "SECTION\tOLD\tNEW\tLINEID");
        assert_eq!(lines[2], "S2\tDEFAULT\t336AL\tLineID");
    }
}
