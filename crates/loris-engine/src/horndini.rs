//! Maximal-conjunction elimination.
//!
//! Horndini computes the largest per-location conjunction consistent with
//! the positive examples and Horn constraints: start from the full
//! attribute interval, knock out every predicate a positive datapoint
//! falsifies, and promote a constraint's conclusion to a positive once all
//! of its premises satisfy the current conjunctions. Conjunctions and
//! premise lists only shrink, so the fixed point terminates.

use tracing::debug;

use loris_ir::{seed_conjunctions, Conjunction, ConstraintId, Corpus, DatapointId};

use crate::error::EngineError;

/// Working copy of one Horn constraint; premises are removed as they become
/// satisfied, and the constraint is discharged when none remain.
struct PendingImplication {
    id: ConstraintId,
    premises: Vec<DatapointId>,
    conclusion: Option<DatapointId>,
}

/// Compute the maximal consistent conjunction vector from scratch.
///
/// Seeds every location with its full attribute interval and runs
/// [`refine`]. Fails with [`EngineError::NoLocations`] on an empty interval
/// list and [`EngineError::Infeasible`] when a conclusion-less constraint's
/// premises are fully discharged.
pub fn horndini(corpus: &Corpus) -> Result<Vec<Conjunction>, EngineError> {
    if corpus.intervals.is_empty() {
        return Err(EngineError::NoLocations);
    }
    let mut conjunctions = seed_conjunctions(&corpus.intervals);
    refine(corpus, &mut conjunctions)?;
    Ok(conjunctions)
}

/// Run the elimination fixed point over caller-provided conjunctions.
///
/// Re-running with the previous output as input is a no-op: every positive
/// datapoint already satisfies its conjunction, so the first pass eliminates
/// nothing and discharges nothing new.
pub fn refine(corpus: &Corpus, conjunctions: &mut [Conjunction]) -> Result<(), EngineError> {
    if corpus.intervals.is_empty() {
        return Err(EngineError::NoLocations);
    }
    if conjunctions.len() != corpus.num_locations() {
        return Err(EngineError::LocationCountMismatch {
            expected: corpus.num_locations(),
            got: conjunctions.len(),
        });
    }

    // Seed the worklist with every classified-positive datapoint.
    let mut worklist: Vec<DatapointId> = corpus
        .datapoints
        .iter()
        .enumerate()
        .filter(|(_, dp)| dp.is_positive())
        .map(|(id, _)| id)
        .collect();

    let mut pending: Vec<PendingImplication> = corpus
        .constraints
        .iter()
        .enumerate()
        .map(|(id, hc)| PendingImplication {
            id,
            premises: hc.premises.clone(),
            conclusion: hc.conclusion,
        })
        .collect();

    // Run at least one pass even without positives: premises can satisfy
    // the seed conjunctions outright, discharging constraints immediately.
    let mut pass = 0usize;
    loop {
        pass += 1;

        // Knock out predicates the positives falsify.
        for dp_id in worklist.drain(..) {
            let dp = &corpus.datapoints[dp_id];
            let interval = corpus.intervals[dp.location];
            conjunctions[dp.location].retain(|&a| dp.values[a - interval.lo]);
        }

        // Discharge premises that now satisfy their conjunction; a fully
        // discharged constraint promotes its conclusion to a positive.
        let mut kept = Vec::with_capacity(pending.len());
        for mut imp in pending {
            imp.premises
                .retain(|&p| !corpus.satisfies(p, &conjunctions[corpus.datapoints[p].location]));
            if imp.premises.is_empty() {
                match imp.conclusion {
                    None => return Err(EngineError::Infeasible { constraint: imp.id }),
                    Some(c) => worklist.push(c),
                }
            } else {
                kept.push(imp);
            }
        }
        pending = kept;

        debug!(
            pass,
            promoted = worklist.len(),
            pending = pending.len(),
            "horndini elimination pass"
        );

        if worklist.is_empty() {
            break;
        }
    }

    // Consistency is the caller's post-condition to assert: Horndini never
    // looks at negative examples, so on a corpus that is infeasible because
    // of its negatives the fixed point still succeeds.
    Ok(())
}
