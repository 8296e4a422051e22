//! Eager reduction policies: add every relevant predicate, or only the
//! first one found.

use tracing::debug;

use loris_ir::{satisfies, AttributeId, Conjunction, ConstraintId, Corpus};

use super::{conclusion_holds, falsifying, premises_hold, prepare};
use crate::consistency::is_consistent;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Additions {
    /// Commit every falsifying candidate exposed by the obligation.
    All,
    /// Commit only the first falsifying candidate, then stop.
    FirstOnly,
}

/// Repair the retained sets by adding *every* relevant predicate exposed by
/// each unresolved negative example and violated Horn constraint.
pub fn reduce_all(
    corpus: &Corpus,
    superset: &[Conjunction],
    retained: &mut [Conjunction],
) -> Result<(), EngineError> {
    reduce_eager(corpus, superset, retained, Additions::All)
}

/// Repair the retained sets by adding only the *first* relevant predicate
/// found per unresolved negative example or violated Horn constraint.
pub fn reduce_first(
    corpus: &Corpus,
    superset: &[Conjunction],
    retained: &mut [Conjunction],
) -> Result<(), EngineError> {
    reduce_eager(corpus, superset, retained, Additions::FirstOnly)
}

/// Move falsifying candidates into the retained set under the policy;
/// returns how many were committed.
fn commit(
    attrs: &[AttributeId],
    candidates: &mut Conjunction,
    retained: &mut Conjunction,
    policy: Additions,
) -> usize {
    let take = match policy {
        Additions::All => attrs.len(),
        Additions::FirstOnly => attrs.len().min(1),
    };
    for &a in &attrs[..take] {
        candidates.remove(&a);
        retained.insert(a);
    }
    take
}

fn reduce_eager(
    corpus: &Corpus,
    superset: &[Conjunction],
    retained: &mut [Conjunction],
    policy: Additions,
) -> Result<(), EngineError> {
    let mut candidates = prepare(superset, retained)?;

    // Negative-example repair: a negative that still (wrongly) satisfies
    // its retained conjunction gains predicates at which it is false.
    for dp in corpus.datapoints.iter().filter(|dp| dp.is_negative()) {
        let loc = dp.location;
        let interval = corpus.intervals[loc];
        if satisfies(dp, &retained[loc], interval) {
            debug_assert!(
                !satisfies(dp, &superset[loc], interval),
                "negative example satisfies the superset: {dp}"
            );
            let attrs = falsifying(dp, interval, &candidates[loc]);
            let added = commit(&attrs, &mut candidates[loc], &mut retained[loc], policy);
            debug_assert!(added > 0, "unresolved negative exposes no candidate");
        }
    }

    // Horn repair fixed point. A constraint whose premises no longer hold
    // is vacuous and dropped for good; one whose conclusion currently holds
    // stays pending, since a later repair can retroactively break it; a
    // live violation is repaired by falsifying a premise, then dropped.
    let mut pending: Vec<ConstraintId> = (0..corpus.constraints.len()).collect();
    loop {
        let mut repaired = 0usize;
        let mut kept = Vec::with_capacity(pending.len());
        for &id in &pending {
            let hc = &corpus.constraints[id];
            if !premises_hold(corpus, hc, retained) {
                continue;
            }
            if conclusion_holds(corpus, hc, retained) {
                kept.push(id);
                continue;
            }
            let mut added = 0usize;
            for &p in &hc.premises {
                let dp = &corpus.datapoints[p];
                let loc = dp.location;
                let attrs = falsifying(dp, corpus.intervals[loc], &candidates[loc]);
                added += commit(&attrs, &mut candidates[loc], &mut retained[loc], policy);
                if policy == Additions::FirstOnly && added > 0 {
                    break;
                }
            }
            debug_assert!(added > 0, "violated constraint {id} exposes no candidate");
            repaired += 1;
        }
        pending = kept;
        debug!(repaired, pending = pending.len(), "horn repair pass");
        if repaired == 0 {
            break;
        }
    }

    debug_assert!(is_consistent(retained, corpus));
    Ok(())
}
