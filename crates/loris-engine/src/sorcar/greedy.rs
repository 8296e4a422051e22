//! Greedy approximate hitting-set reduction.
//!
//! Builds, per candidate predicate, the set of unresolved negative examples
//! and violated Horn constraints it would fix, then repeatedly commits the
//! candidate covering the most outstanding obligations, removing covered
//! obligations from every other candidate as it goes. Because committing
//! predicates can retroactively break previously satisfied conclusions, the
//! outer loop re-scans for newly exposed violations until a round selects
//! nothing.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use loris_ir::{satisfies, AttributeId, Conjunction, ConstraintId, Corpus, DatapointId, LocationId};

use super::{conclusion_holds, falsifying, premises_hold, prepare};
use crate::consistency::is_consistent;
use crate::error::EngineError;

/// The obligations a candidate predicate would fix if committed.
#[derive(Debug, Clone, Default)]
struct Obligations {
    negatives: BTreeSet<DatapointId>,
    constraints: BTreeSet<ConstraintId>,
}

impl Obligations {
    fn weight(&self) -> usize {
        self.negatives.len() + self.constraints.len()
    }
}

/// Per-location coverage bookkeeping; `BTreeMap` iteration order makes the
/// tie-break ("first candidate found wins on equal weight") deterministic.
type Coverage = Vec<BTreeMap<AttributeId, Obligations>>;

/// Repair the retained sets with a greedy hitting set over the candidate
/// pool.
pub fn reduce_greedy(
    corpus: &Corpus,
    superset: &[Conjunction],
    retained: &mut [Conjunction],
) -> Result<(), EngineError> {
    let mut candidates = prepare(superset, retained)?;
    let mut coverage: Coverage = vec![BTreeMap::new(); superset.len()];

    // Register unresolved negatives once; the first selection round
    // resolves all of them.
    for (id, dp) in corpus.datapoints.iter().enumerate() {
        if !dp.is_negative() {
            continue;
        }
        let loc = dp.location;
        let interval = corpus.intervals[loc];
        if satisfies(dp, &retained[loc], interval) {
            for a in falsifying(dp, interval, &candidates[loc]) {
                coverage[loc].entry(a).or_default().negatives.insert(id);
            }
        }
    }

    loop {
        // Register the candidates of every currently violated constraint.
        let mut violated = 0usize;
        for (id, hc) in corpus.constraints.iter().enumerate() {
            if !premises_hold(corpus, hc, retained) || conclusion_holds(corpus, hc, retained) {
                continue;
            }
            violated += 1;
            for &p in &hc.premises {
                let dp = &corpus.datapoints[p];
                let loc = dp.location;
                for a in falsifying(dp, corpus.intervals[loc], &candidates[loc]) {
                    coverage[loc].entry(a).or_default().constraints.insert(id);
                }
            }
        }

        // Commit the best candidate until none covers anything.
        let mut selected: Vec<(LocationId, AttributeId)> = Vec::new();
        loop {
            let mut best: Option<(usize, LocationId, AttributeId)> = None;
            for (loc, per_location) in coverage.iter().enumerate() {
                for (&a, obligations) in per_location {
                    let weight = obligations.weight();
                    if weight > best.map_or(0, |(w, _, _)| w) {
                        best = Some((weight, loc, a));
                    }
                }
            }
            let Some((_, loc, a)) = best else { break };

            let covered = coverage[loc].get(&a).cloned().unwrap_or_default();
            // The covered obligations are settled: remove them from every
            // other candidate's books.
            for &dp_id in &covered.negatives {
                let dp = &corpus.datapoints[dp_id];
                let dloc = dp.location;
                for c in falsifying(dp, corpus.intervals[dloc], &candidates[dloc]) {
                    if let Some(o) = coverage[dloc].get_mut(&c) {
                        o.negatives.remove(&dp_id);
                    }
                }
            }
            for &hc_id in &covered.constraints {
                for &p in &corpus.constraints[hc_id].premises {
                    let dp = &corpus.datapoints[p];
                    let dloc = dp.location;
                    for c in falsifying(dp, corpus.intervals[dloc], &candidates[dloc]) {
                        if let Some(o) = coverage[dloc].get_mut(&c) {
                            o.constraints.remove(&hc_id);
                        }
                    }
                }
            }
            coverage[loc].remove(&a);
            selected.push((loc, a));
        }

        // Selection only stops once every registered obligation is covered.
        debug_assert!(coverage
            .iter()
            .all(|per_location| per_location.values().all(|o| o.weight() == 0)));

        for &(loc, a) in &selected {
            retained[loc].insert(a);
            candidates[loc].remove(&a);
        }
        debug!(violated, selected = selected.len(), "greedy selection round");

        if selected.is_empty() {
            // A violated constraint that exposes no candidate would mean
            // the superset itself is inconsistent; stop rather than spin.
            debug_assert!(violated == 0, "violated constraint exposes no candidate");
            break;
        }
    }

    debug_assert!(is_consistent(retained, corpus));
    Ok(())
}
