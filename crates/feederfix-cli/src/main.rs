use clap::Parser;
use feederfix_cli::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Resolve {
            study,
            tuning,
            out,
            format,
            report_dir,
        } => commands::resolve::handle(
            study,
            tuning,
            out.as_deref(),
            *format,
            report_dir.as_deref(),
        ),
        Commands::Inspect { study, config } => commands::inspect::handle(study, config.as_deref()),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
