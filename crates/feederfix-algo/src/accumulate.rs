//! Candidate accumulation along one directional walk.
//!
//! The walk visits neighbors nearest-first. For each neighbor governed by a
//! device of the same category:
//!
//! 1. the load gate is evaluated against the source section's downstream load;
//! 2. every requested attribute must be present and concrete on the neighbor,
//!    otherwise the neighbor contributes nothing at all;
//! 3. each concrete value is folded into the running candidate (first value
//!    adopted, equal values ignored, a differing value marks a conflict);
//! 4. once every attribute is either a load-similar value or a conflict the
//!    walk stops.
//!
//! A neighbor of a different category ends the walk. Attributes still unset at
//! the end become conflicts.

use feederfix_core::{DeviceRef, FeederResult, NetworkModel, SectionId};
use tracing::trace;

use crate::candidate::CandidateSet;
use crate::classifier::PlaceholderSet;
use crate::index::ConductorIndex;
use crate::similarity::LoadSimilarityGate;

/// Result of one directional walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    pub candidates: CandidateSet,
    /// Load-gate result at the neighbor where the walk ended (or the last one
    /// considered).
    pub in_kva: bool,
}

pub struct Accumulator<'a> {
    index: &'a ConductorIndex,
    placeholders: &'a PlaceholderSet,
    gate: LoadSimilarityGate,
}

impl<'a> Accumulator<'a> {
    pub fn new(
        index: &'a ConductorIndex,
        placeholders: &'a PlaceholderSet,
        gate: LoadSimilarityGate,
    ) -> Self {
        Self {
            index,
            placeholders,
            gate,
        }
    }

    pub fn accumulate<N, I>(
        &self,
        model: &N,
        source: &DeviceRef,
        walk: I,
        attributes: &[String],
    ) -> FeederResult<Accumulation>
    where
        N: NetworkModel,
        I: Iterator<Item = (SectionId, usize)>,
    {
        let reference = model.downstream_load(source)?;
        let mut candidates = CandidateSet::new(attributes);
        let mut in_kva = false;

        'walk: for (section, depth) in walk {
            in_kva = false;
            let Some(neighbor) = self.index.get(&section) else {
                continue;
            };
            if neighbor.category != source.category {
                trace!(section = %section, depth, "category changes; walk ends");
                break;
            }
            in_kva = self
                .gate
                .in_range(reference, model.downstream_load(neighbor)?);

            // Staged so a neighbor with any placeholder leaves no trace.
            let mut staged = candidates.clone();
            let mut settled = true;
            for attribute in attributes {
                let value = model.attribute(neighbor, attribute)?;
                if self.placeholders.is_placeholder(&value) {
                    trace!(section = %section, attribute = %attribute, "neighbor is itself a placeholder");
                    continue 'walk;
                }
                if value.is_empty() {
                    trace!(section = %section, attribute = %attribute, "neighbor has no value");
                    continue 'walk;
                }
                if let Some(candidate) = staged.get_mut(attribute) {
                    candidate.merge(&value);
                    if !(in_kva || candidate.is_conflict()) {
                        settled = false;
                    }
                }
            }
            candidates = staged;
            trace!(section = %section, depth, in_kva, settled, "neighbor folded in");
            if settled {
                break;
            }
        }

        candidates.finalize();
        Ok(Accumulation { candidates, in_kva })
    }
}
