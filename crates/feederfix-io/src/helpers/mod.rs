pub mod feeder_builder;

pub use feeder_builder::FeederBuilder;

use feederfix_core::{Diagnostics, Study};

/// A loaded study plus everything worth telling the user about it.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub study: Study,
    pub diagnostics: Diagnostics,
}
