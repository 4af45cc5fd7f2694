use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "feederfix", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill placeholder conductor ids from neighboring sections
    Resolve {
        /// Study file (.toml or .json)
        #[arg(value_hint = ValueHint::FilePath)]
        study: PathBuf,
        #[command(flatten)]
        tuning: ResolverArgs,
        /// Write the updated study here (format follows the extension)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Output format for the report
        #[arg(long, value_enum, default_value_t = ReportFormat::Plain)]
        format: ReportFormat,
        /// Also write changed.csv and input_required.csv into this directory
        #[arg(long, value_hint = ValueHint::DirPath)]
        report_dir: Option<PathBuf>,
    },
    /// Count conductor devices and placeholders without changing anything
    Inspect {
        /// Study file (.toml or .json)
        #[arg(value_hint = ValueHint::FilePath)]
        study: PathBuf,
        /// Resolver config file; its category table and sentinels are used
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
    },
}

/// Resolver settings layered over the defaults and an optional config file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ResolverArgs {
    /// Resolver config file (TOML)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Traversal horizon in hops
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Maximum relative downstream-load difference (e.g. 0.1 for 10%)
    #[arg(long)]
    pub max_kva_diff: Option<f64>,
    /// Placeholder sentinel substring; repeat to give several (replaces the configured set)
    #[arg(long = "placeholder")]
    pub placeholders: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Plain,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn resolve_flags_parse() {
        let cli = Cli::try_parse_from([
            "feederfix",
            "--log-level",
            "debug",
            "resolve",
            "feeder.toml",
            "--max-depth",
            "4",
            "--placeholder",
            "DEFAULT",
            "--placeholder",
            "TBD",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        match cli.command {
            Commands::Resolve { tuning, format, .. } => {
                assert_eq!(tuning.max_depth, Some(4));
                assert_eq!(tuning.placeholders, vec!["DEFAULT", "TBD"]);
                assert_eq!(format, ReportFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
