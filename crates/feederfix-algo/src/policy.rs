//! Upstream/downstream reconciliation for one device.

use feederfix_core::{DeviceRef, Direction, FeederResult, NetworkModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::accumulate::{Accumulation, Accumulator};
use crate::candidate::Candidate;
use crate::classifier::PlaceholderSet;
use crate::index::ConductorIndex;
use crate::records::{ChangeRecord, Ledger, UnresolvedRecord};
use crate::similarity::LoadSimilarityGate;
use crate::traversal::traverse;

/// Which precedence rule produced an adopted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Only the upstream walk found a value.
    UpstreamOnly,
    /// Only the downstream walk found a value.
    DownstreamOnly,
    /// Both walks found the same value.
    Agreement,
    /// Values differ; only upstream was load-similar.
    UpstreamLoadMatch,
    /// Values differ; only downstream was load-similar.
    DownstreamLoadMatch,
    /// Values differ and load similarity does not separate them.
    DownstreamTieBreak,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::UpstreamOnly => "upstream_only",
            Rule::DownstreamOnly => "downstream_only",
            Rule::Agreement => "agreement",
            Rule::UpstreamLoadMatch => "upstream_load_match",
            Rule::DownstreamLoadMatch => "downstream_load_match",
            Rule::DownstreamTieBreak => "downstream_tie_break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Adopt { value: String, rule: Rule },
    Defer,
}

/// Pick a final value for one attribute from the two finished walks.
///
/// When both sides are concrete and disagree, a side wins only if it alone
/// was load-similar. Both-similar and neither-similar both fall back to
/// downstream.
pub fn decide(up: &Candidate, down: &Candidate, up_in_kva: bool, down_in_kva: bool) -> Decision {
    let adopt = |value: &str, rule| Decision::Adopt {
        value: value.to_string(),
        rule,
    };
    match (up.value(), down.value()) {
        (None, None) => Decision::Defer,
        (Some(up), None) => adopt(up, Rule::UpstreamOnly),
        (None, Some(down)) => adopt(down, Rule::DownstreamOnly),
        (Some(up), Some(down)) if up == down => adopt(down, Rule::Agreement),
        (Some(up), Some(_)) if up_in_kva && !down_in_kva => adopt(up, Rule::UpstreamLoadMatch),
        (Some(_), Some(down)) if !up_in_kva && down_in_kva => {
            adopt(down, Rule::DownstreamLoadMatch)
        }
        (Some(_), Some(down)) => adopt(down, Rule::DownstreamTieBreak),
    }
}

/// Shared, read-only state for resolving devices within one run.
pub struct ResolutionContext<'a> {
    pub index: &'a ConductorIndex,
    pub placeholders: &'a PlaceholderSet,
    pub gate: LoadSimilarityGate,
    pub max_depth: usize,
}

impl<'a> ResolutionContext<'a> {
    fn walk<N: NetworkModel>(
        &self,
        model: &N,
        device: &DeviceRef,
        direction: Direction,
        attributes: &[String],
    ) -> FeederResult<Accumulation> {
        let walk = traverse(model, device, direction, self.max_depth)?;
        Accumulator::new(self.index, self.placeholders, self.gate)
            .accumulate(model, device, walk, attributes)
    }
}

/// Per-device tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceOutcome {
    pub changed: usize,
    pub deferred: usize,
}

/// Walk upstream and downstream from `device`, then settle each attribute.
///
/// Adopted values are written to the model immediately so later devices in
/// the same pass see them.
///
/// An adoption that leaves the attribute unchanged (`old == new`) is neither
/// written nor recorded. This mostly affects the concrete attributes of a
/// per-phase device, which are re-decided alongside its placeholders: they
/// only show up in the changed report when the neighbors disagree with them.
/// It also means a second run over a resolved feeder reports no changes.
pub fn resolve_device<N: NetworkModel>(
    model: &mut N,
    ctx: &ResolutionContext<'_>,
    device: &DeviceRef,
    attributes: &[String],
    changed: &mut Ledger<ChangeRecord>,
    deferred: &mut Ledger<UnresolvedRecord>,
) -> FeederResult<DeviceOutcome> {
    let up = ctx.walk(&*model, device, Direction::Upstream, attributes)?;
    let down = ctx.walk(&*model, device, Direction::Downstream, attributes)?;
    trace!(
        section = %device.section,
        up_in_kva = up.in_kva,
        down_in_kva = down.in_kva,
        "walks finished"
    );

    let mut outcome = DeviceOutcome::default();
    for attribute in attributes {
        let up_value = up.candidates.get(attribute).cloned().unwrap_or_default();
        let down_value = down.candidates.get(attribute).cloned().unwrap_or_default();
        match decide(&up_value, &down_value, up.in_kva, down.in_kva) {
            Decision::Adopt { value, rule } => {
                let old = model.attribute(device, attribute)?;
                if old == value {
                    continue;
                }
                debug!(
                    section = %device.section,
                    attribute = %attribute,
                    old = %old,
                    new = %value,
                    rule = rule.as_str(),
                    "conductor attribute resolved"
                );
                model.set_attribute(device, attribute, &value)?;
                changed.record(ChangeRecord {
                    section: device.section.clone(),
                    attribute: attribute.clone(),
                    old,
                    new: value,
                    rule,
                });
                outcome.changed += 1;
            }
            Decision::Defer => {
                debug!(section = %device.section, attribute = %attribute, "input required");
                deferred.record(UnresolvedRecord {
                    device: device.clone(),
                    attribute: attribute.clone(),
                    upstream: up_value,
                    downstream: down_value,
                });
                outcome.deferred += 1;
            }
        }
    }
    Ok(outcome)
}
