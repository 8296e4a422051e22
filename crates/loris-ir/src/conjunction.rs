//! The conjunction working type and its set algebra.
//!
//! A conjunction is a set of global attribute indices for one location,
//! denoting the logical AND of the named predicates. The empty conjunction
//! is `true`. `BTreeSet` keeps iteration sorted, which makes persistence
//! and greedy tie-breaking deterministic.

use std::collections::BTreeSet;

use crate::attributes::AttributeInterval;
use crate::datapoint::{AttributeId, Datapoint};

/// A set of attribute indices interpreted as their conjunction.
pub type Conjunction = BTreeSet<AttributeId>;

/// Whether a datapoint satisfies a conjunction.
///
/// False as soon as any index in the conjunction is false in the datapoint;
/// the empty conjunction is satisfied by everything. No side effects.
pub fn satisfies(dp: &Datapoint, conjunction: &Conjunction, interval: AttributeInterval) -> bool {
    conjunction.iter().all(|&a| {
        debug_assert!(
            interval.contains(a),
            "attribute {a} outside interval [{}, {}]",
            interval.lo,
            interval.hi
        );
        dp.values[a - interval.lo]
    })
}

/// Full-interval conjunctions, one per location: the starting point of the
/// maximal-conjunction fixed point.
pub fn seed_conjunctions(intervals: &[AttributeInterval]) -> Vec<Conjunction> {
    intervals.iter().map(|iv| iv.indices().collect()).collect()
}

/// In-place split of a candidate superset against a retained set.
///
/// Per location, shrinks `retained[i]` to `retained[i] ∩ superset[i]` and
/// returns the per-location difference `superset[i] \ retained[i]`, the
/// candidate pool the reductions draw from.
pub fn split_retained(
    superset: &[Conjunction],
    retained: &mut [Conjunction],
) -> Vec<Conjunction> {
    debug_assert_eq!(superset.len(), retained.len());
    superset
        .iter()
        .zip(retained.iter_mut())
        .map(|(sup, ret)| {
            ret.retain(|a| sup.contains(a));
            sup.difference(ret).copied().collect()
        })
        .collect()
}

/// Total number of retained predicates across all locations.
pub fn total_size(conjunctions: &[Conjunction]) -> usize {
    conjunctions.iter().map(BTreeSet::len).sum()
}
