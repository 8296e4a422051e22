//! Retained-conjunction reduction against a fresh superset.
//!
//! Every policy shares the same skeleton: validate the argument shapes,
//! intersect the carried-over retained sets with the superset, then repair
//! the result against negative examples and Horn constraints by moving
//! predicates from the per-location candidate pool `superset \ retained`
//! into the retained set. The policies differ only in *which* candidates
//! they commit:
//!
//! - [`reduce_all`]: every falsifying candidate
//! - [`reduce_first`]: the first falsifying candidate found
//! - [`reduce_greedy`]: a greedy approximate hitting set
//! - [`reduce_minimal`]: a minimum-cardinality selection via bounded
//!   satisfiability search

mod eager;
mod greedy;
mod minimal;

pub use eager::{reduce_all, reduce_first};
pub use greedy::reduce_greedy;
pub use minimal::{reduce_minimal, reduce_minimal_with};

use loris_ir::{split_retained, AttributeId, AttributeInterval, Conjunction, Corpus, Datapoint, HornConstraint};

use crate::error::EngineError;

/// Shared entry step: argument checks, then `retained := retained ∩
/// superset` in place, returning the per-location candidate pools
/// `superset \ retained`. Rejects bad shapes before any mutation.
fn prepare(
    superset: &[Conjunction],
    retained: &mut [Conjunction],
) -> Result<Vec<Conjunction>, EngineError> {
    if superset.is_empty() {
        return Err(EngineError::EmptySuperset);
    }
    if superset.len() != retained.len() {
        return Err(EngineError::RetainedSizeMismatch {
            superset: superset.len(),
            retained: retained.len(),
        });
    }
    Ok(split_retained(superset, retained))
}

/// Candidate attributes in `pool` at which the datapoint is false;
/// committing any of them stops the datapoint satisfying the conjunction.
fn falsifying(dp: &Datapoint, interval: AttributeInterval, pool: &Conjunction) -> Vec<AttributeId> {
    pool.iter()
        .copied()
        .filter(|&a| !dp.values[a - interval.lo])
        .collect()
}

fn premises_hold(corpus: &Corpus, hc: &HornConstraint, retained: &[Conjunction]) -> bool {
    hc.premises
        .iter()
        .all(|&p| corpus.satisfies(p, &retained[corpus.datapoints[p].location]))
}

fn conclusion_holds(corpus: &Corpus, hc: &HornConstraint, retained: &[Conjunction]) -> bool {
    hc.conclusion
        .map(|c| corpus.satisfies(c, &retained[corpus.datapoints[c].location]))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loris_ir::Datapoint;

    fn conj(indices: &[usize]) -> Conjunction {
        indices.iter().copied().collect()
    }

    #[test]
    fn prepare_rejects_empty_superset() {
        let mut retained: Vec<Conjunction> = vec![];
        assert_eq!(prepare(&[], &mut retained), Err(EngineError::EmptySuperset));
    }

    #[test]
    fn prepare_rejects_size_mismatch_without_mutation() {
        let superset = vec![conj(&[0]), conj(&[1])];
        let mut retained = vec![conj(&[0, 9])];
        assert_eq!(
            prepare(&superset, &mut retained),
            Err(EngineError::RetainedSizeMismatch {
                superset: 2,
                retained: 1,
            })
        );
        // The stale index survives: nothing was touched.
        assert_eq!(retained, vec![conj(&[0, 9])]);
    }

    #[test]
    fn prepare_splits_into_intersection_and_difference() {
        let superset = vec![conj(&[0, 1, 2])];
        let mut retained = vec![conj(&[1, 5])];
        let candidates = prepare(&superset, &mut retained).expect("shapes are valid");
        assert_eq!(retained, vec![conj(&[1])]);
        assert_eq!(candidates, vec![conj(&[0, 2])]);
    }

    #[test]
    fn falsifying_respects_interval_offsets() {
        let interval = AttributeInterval::new(3, 5);
        let dp = Datapoint::classified(1, vec![false, true, false], false);
        assert_eq!(falsifying(&dp, interval, &conj(&[3, 4, 5])), vec![3, 5]);
        assert_eq!(falsifying(&dp, interval, &conj(&[4])), Vec::<usize>::new());
    }
}
