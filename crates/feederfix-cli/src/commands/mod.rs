pub mod inspect;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use feederfix_algo::ResolverConfig;
use feederfix_cli::cli::ResolverArgs;
use tracing::debug;

/// Defaults, then the optional config file, then command-line overrides.
/// The merged result is validated before it is returned.
pub fn layered_config(args: &ResolverArgs) -> Result<ResolverConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(max_kva_diff) = args.max_kva_diff {
        config.max_kva_diff = max_kva_diff;
    }
    if !args.placeholders.is_empty() {
        config.placeholders = args.placeholders.clone();
    }
    config.validate().context("invalid resolver settings")?;
    debug!(
        max_depth = config.max_depth,
        max_kva_diff = config.max_kva_diff,
        placeholders = ?config.placeholders,
        refinement_passes = config.refinement_passes,
        "resolver configuration"
    );
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("loading resolver config '{}'", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}
