//! Full resolution run: index, first pass, refinement.

use std::collections::BTreeMap;
use std::fmt;

use feederfix_core::{FeederResult, NetworkModel, Study};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::{ResolverConfig, Worklist};
use crate::index::{needs_resolution, ConductorIndex};
use crate::policy::{resolve_device, ResolutionContext};
use crate::records::{ChangeRecord, Ledger, UnresolvedRecord};
use crate::report::{changed_table, input_required_table, ReportTable};
use crate::similarity::LoadSimilarityGate;

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Sections with a governing conductor device
    pub indexed_devices: usize,
    /// Device records ignored because their section was already governed
    pub shadowed_devices: usize,
    /// Devices queued at index time, by worklist
    pub queued: BTreeMap<String, usize>,
    pub first_pass_changes: usize,
    pub refinement_changes: usize,
    pub input_required: usize,
}

impl fmt::Display for ResolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed ({} first pass, {} refinement), {} input required",
            self.first_pass_changes + self.refinement_changes,
            self.first_pass_changes,
            self.refinement_changes,
            self.input_required
        )
    }
}

/// Outcome of [`resolve_conductors`].
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    /// Applied changes, first resolved first
    pub changed: Vec<ChangeRecord>,
    /// Attributes still unresolved after refinement
    pub input_required: Vec<UnresolvedRecord>,
    pub stats: ResolutionStats,
}

impl ResolutionReport {
    pub fn changed_table(&self) -> ReportTable {
        changed_table(&self.changed)
    }

    pub fn input_required_table(&self) -> ReportTable {
        input_required_table(&self.input_required)
    }

    pub fn is_clean(&self) -> bool {
        self.input_required.is_empty()
    }
}

/// Resolve every placeholder conductor attribute in `model`.
///
/// The index is built once. The first pass drains the worklists in
/// [`Worklist::ORDER`]; a queued device is skipped if an earlier fix already
/// left it without placeholders. Each refinement pass then retries the
/// deferred attributes one at a time, and whatever the last pass still defers
/// is reported as input required.
pub fn resolve_conductors<N: NetworkModel>(
    model: &mut N,
    config: &ResolverConfig,
) -> FeederResult<ResolutionReport> {
    config.validate()?;
    let placeholders = config.placeholder_set();
    let index = ConductorIndex::build(&*model, &config.categories, &placeholders)?;

    let mut stats = ResolutionStats {
        indexed_devices: index.len(),
        shadowed_devices: index.shadowed(),
        ..ResolutionStats::default()
    };
    for worklist in Worklist::ORDER {
        stats
            .queued
            .insert(worklist.as_str().to_string(), index.worklist(worklist).len());
    }
    info!(
        indexed = index.len(),
        pending = index.pending(),
        shadowed = index.shadowed(),
        "conductor index built"
    );

    let ctx = ResolutionContext {
        index: &index,
        placeholders: &placeholders,
        gate: LoadSimilarityGate::new(config.max_kva_diff),
        max_depth: config.max_depth,
    };
    let mut changed = Ledger::new();
    let mut deferred = Ledger::new();

    for worklist in Worklist::ORDER {
        for device in index.worklist(worklist) {
            let Some(spec) = config.category(device.category) else {
                continue;
            };
            if !needs_resolution(&*model, device, &spec.attributes, &placeholders)? {
                trace!(section = %device.section, "already resolved by an earlier fix");
                continue;
            }
            let outcome =
                resolve_device(model, &ctx, device, &spec.attributes, &mut changed, &mut deferred)?;
            stats.first_pass_changes += outcome.changed;
        }
        debug!(worklist = worklist.as_str(), "worklist drained");
    }
    info!(
        changed = stats.first_pass_changes,
        deferred = deferred.len(),
        "first pass complete"
    );

    for pass in 1..=config.refinement_passes {
        if deferred.is_empty() {
            break;
        }
        let mut remaining = Ledger::new();
        let mut pass_changes = 0;
        for record in &deferred {
            let outcome = resolve_device(
                model,
                &ctx,
                &record.device,
                std::slice::from_ref(&record.attribute),
                &mut changed,
                &mut remaining,
            )?;
            pass_changes += outcome.changed;
        }
        info!(
            pass,
            changed = pass_changes,
            deferred = remaining.len(),
            "refinement pass complete"
        );
        stats.refinement_changes += pass_changes;
        deferred = remaining;
    }

    for record in &deferred {
        warn!(
            section = %record.section(),
            attribute = %record.attribute,
            "input required"
        );
    }
    stats.input_required = deferred.len();

    Ok(ResolutionReport {
        changed: changed.into_vec(),
        input_required: deferred.into_vec(),
        stats,
    })
}

/// Check that exactly one network is loaded, then resolve it.
pub fn resolve_study(study: &mut Study, config: &ResolverConfig) -> FeederResult<ResolutionReport> {
    let feeder = study.single_feeder_mut()?;
    info!(feeder = %feeder.id, "resolving conductor attributes");
    resolve_conductors(feeder, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestFeeder;
    use feederfix_core::ConductorCategory::*;
    use feederfix_core::{FeederError, NetworkModel, SectionId};

    #[test]
    fn invalid_config_aborts_before_indexing() {
        let mut feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 10.0, OverheadLine, &[("LineID", "DEFAULT")])
            .build();
        let config = ResolverConfig {
            placeholders: vec![],
            ..ResolverConfig::default()
        };
        assert!(matches!(
            resolve_conductors(&mut feeder, &config),
            Err(FeederError::Config(_))
        ));
    }

    #[test]
    fn stats_count_queued_devices_per_worklist() {
        let mut feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 100.0, OverheadLine, &[("LineID", "336AL")])
            .section("S2", "A", "B", 100.0, OverheadLine, &[("LineID", "DEFAULT")])
            .section("S3", "B", "C", 100.0, Underground, &[("CableID", "DEFAULT")])
            .build();
        let report = resolve_conductors(&mut feeder, &ResolverConfig::default()).unwrap();
        assert_eq!(report.stats.indexed_devices, 3);
        assert_eq!(report.stats.queued["overhead"], 1);
        assert_eq!(report.stats.queued["overhead_by_phase"], 0);
        assert_eq!(report.stats.queued["underground"], 1);
        assert_eq!(report.stats.first_pass_changes, 1);
        assert_eq!(report.stats.input_required, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn later_devices_see_earlier_fixes() {
        // S3's upstream walk meets S2 after S2 was fixed in the same pass.
        let mut feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 100.0, OverheadLine, &[("LineID", "336AL")])
            .section("S2", "A", "B", 100.0, OverheadLine, &[("LineID", "DEFAULT")])
            .section("S3", "B", "C", 100.0, OverheadLine, &[("LineID", "DEFAULT")])
            .build();
        let report = resolve_conductors(&mut feeder, &ResolverConfig::default()).unwrap();
        assert_eq!(report.changed.len(), 2);
        let s3 = feeder.list_devices(OverheadLine)[2].clone();
        assert_eq!(s3.section, SectionId::new("S3"));
        assert_eq!(feeder.attribute(&s3, "LineID").unwrap(), "336AL");
    }

    #[test]
    fn zero_refinement_passes_reports_first_pass_deferrals() {
        let mut feeder = TestFeeder::new()
            .section("S1", "SRC", "A", 100.0, OverheadLine, &[("LineID", "DEFAULT")])
            .build();
        let config = ResolverConfig {
            refinement_passes: 0,
            ..ResolverConfig::default()
        };
        let report = resolve_conductors(&mut feeder, &config).unwrap();
        assert_eq!(report.input_required.len(), 1);
        assert_eq!(report.stats.refinement_changes, 0);
    }
}
