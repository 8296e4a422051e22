//! Proptest strategies for generating feasible learning corpora.
//!
//! A hidden target conjunction is drawn per location; datapoint labels and
//! Horn constraints are then derived from it, so a consistent conjunction
//! vector is guaranteed to exist and the maximal-conjunction fixed point is
//! guaranteed to succeed on every generated corpus.

use proptest::prelude::*;

use crate::attributes::AttributeInterval;
use crate::conjunction::Conjunction;
use crate::corpus::Corpus;
use crate::datapoint::Datapoint;
use crate::horn::HornConstraint;

/// Raw material for one datapoint: location pick, value bits (truncated to
/// the location's width), and whether the datapoint is classified.
type RawDatapoint = (usize, Vec<bool>, bool);
/// Raw material for one Horn constraint: premise picks and a conclusion
/// pick (`None` = conclusion-less).
type RawConstraint = (Vec<usize>, Option<usize>);

/// Strategy for a corpus on which a consistent conjunction vector exists.
///
/// Generated corpora have:
/// - 1–3 locations with interval widths 2–5, partitioning the global
///   attribute space into contiguous blocks
/// - 4–12 datapoints, ~80% classified, labels consistent with the hidden
///   target conjunction
/// - 0–4 Horn constraints, each repaired to hold under the target
pub fn arb_feasible_corpus() -> impl Strategy<Value = Corpus> {
    (1..=3usize)
        .prop_flat_map(|nlocs| proptest::collection::vec(2..=5usize, nlocs))
        .prop_flat_map(|widths| {
            let total: usize = widths.iter().sum();
            let nlocs = widths.len();
            let max_width = *widths.iter().max().expect("at least one location");
            let target_mask = proptest::collection::vec(any::<bool>(), total);
            let datapoints = proptest::collection::vec(
                (
                    0..nlocs,
                    proptest::collection::vec(any::<bool>(), max_width),
                    proptest::bool::weighted(0.8),
                ),
                4..=12,
            );
            let constraints = proptest::collection::vec(
                (
                    proptest::collection::vec(0..64usize, 1..=3),
                    proptest::option::of(0..64usize),
                ),
                0..=4,
            );
            (Just(widths), target_mask, datapoints, constraints)
        })
        .prop_map(|(widths, target_mask, datapoints, constraints)| {
            assemble(&widths, &target_mask, datapoints, constraints)
        })
}

fn assemble(
    widths: &[usize],
    target_mask: &[bool],
    raw_datapoints: Vec<RawDatapoint>,
    raw_constraints: Vec<RawConstraint>,
) -> Corpus {
    // Contiguous intervals from the width list.
    let mut intervals = Vec::with_capacity(widths.len());
    let mut lo = 0usize;
    for &w in widths {
        intervals.push(AttributeInterval::new(lo, lo + w - 1));
        lo += w;
    }

    // Hidden target conjunction per location, sliced out of the mask.
    let targets: Vec<Conjunction> = intervals
        .iter()
        .map(|iv| iv.indices().filter(|&a| target_mask[a]).collect())
        .collect();

    // Datapoints labeled by the target.
    let mut datapoints = Vec::with_capacity(raw_datapoints.len());
    let mut holds_target = Vec::with_capacity(raw_datapoints.len());
    for (location, bits, classified) in raw_datapoints {
        let values = bits[..widths[location]].to_vec();
        let dp = Datapoint::unclassified(location, values);
        let holds =
            crate::conjunction::satisfies(&dp, &targets[location], intervals[location]);
        holds_target.push(holds);
        datapoints.push(Datapoint {
            label: classified.then_some(holds),
            ..dp
        });
    }

    // Horn constraints repaired to hold under the target: when every
    // premise satisfies the target, the conclusion must too (a constraint
    // that cannot be repaired is dropped).
    let n = datapoints.len();
    let mut constraints = Vec::new();
    for (raw_premises, raw_conclusion) in raw_constraints {
        let premises: Vec<usize> = raw_premises.into_iter().map(|p| p % n).collect();
        let all_hold = premises.iter().all(|&p| holds_target[p]);
        let conclusion = if all_hold {
            match raw_conclusion
                .map(|c| c % n)
                .filter(|&c| holds_target[c])
                .or_else(|| (0..n).find(|&c| holds_target[c]))
            {
                Some(c) => Some(c),
                None => continue,
            }
        } else {
            raw_conclusion.map(|c| c % n)
        };
        constraints.push(HornConstraint::new(premises, conclusion));
    }

    Corpus::new(datapoints, constraints, intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_corpora_are_well_formed(corpus in arb_feasible_corpus()) {
            prop_assert!(corpus.validate().is_empty());
            prop_assert!(!corpus.datapoints.is_empty());
            for hc in &corpus.constraints {
                prop_assert!(!hc.premises.is_empty());
            }
        }
    }
}
