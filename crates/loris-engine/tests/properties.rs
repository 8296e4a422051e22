//! Cross-algorithm properties over generated feasible corpora.

use proptest::prelude::*;

use loris_engine::{
    horndini, is_consistent, reduce_all, reduce_first, reduce_greedy, reduce_minimal, refine,
};
use loris_ir::conjunction::total_size;
use loris_ir::proptest_generators::arb_feasible_corpus;
use loris_ir::{AttributeInterval, Conjunction, Corpus, Datapoint};

type Reduction = fn(&Corpus, &[Conjunction], &mut [Conjunction]) -> Result<(), loris_engine::EngineError>;

const REDUCTIONS: [(&str, Reduction); 4] = [
    ("all", reduce_all),
    ("first", reduce_first),
    ("greedy", reduce_greedy),
    ("minimal", reduce_minimal),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Horndini succeeds on every feasible corpus and its output satisfies
    /// the full consistency oracle.
    #[test]
    fn horndini_is_sound(corpus in arb_feasible_corpus()) {
        let superset = horndini(&corpus).expect("generated corpora are feasible");
        prop_assert!(is_consistent(&superset, &corpus));
    }

    /// Re-running the elimination with its own output as the initial
    /// superset changes nothing.
    #[test]
    fn horndini_is_idempotent(corpus in arb_feasible_corpus()) {
        let superset = horndini(&corpus).expect("generated corpora are feasible");
        let mut again = superset.clone();
        refine(&corpus, &mut again).expect("still feasible");
        prop_assert_eq!(again, superset);
    }

    /// Every reduction yields a consistent retained set, and that set is
    /// per-location sandwiched between the carried-over intersection and
    /// the superset.
    #[test]
    fn reductions_are_sound_and_monotone(corpus in arb_feasible_corpus(), seed in any::<u64>()) {
        let superset = horndini(&corpus).expect("generated corpora are feasible");
        let carried = arbitrary_carried_set(&superset, seed);

        for (name, reduce) in REDUCTIONS {
            let mut retained = carried.clone();
            reduce(&corpus, &superset, &mut retained)
                .unwrap_or_else(|e| panic!("{name} failed: {e}"));
            prop_assert!(is_consistent(&retained, &corpus), "{} is inconsistent", name);

            for (loc, conj) in retained.iter().enumerate() {
                prop_assert!(
                    conj.is_subset(&superset[loc]),
                    "{} grew past the superset at location {}", name, loc
                );
                let floor: Conjunction = carried[loc]
                    .intersection(&superset[loc])
                    .copied()
                    .collect();
                prop_assert!(
                    floor.is_subset(conj),
                    "{} dropped carried-over predicates at location {}", name, loc
                );
            }
        }
    }

    /// The minimal reduction never retains more predicates in total than
    /// any other policy on the same inputs.
    #[test]
    fn minimal_has_smallest_cardinality(corpus in arb_feasible_corpus(), seed in any::<u64>()) {
        let superset = horndini(&corpus).expect("generated corpora are feasible");
        let carried = arbitrary_carried_set(&superset, seed);

        let mut minimal = carried.clone();
        reduce_minimal(&corpus, &superset, &mut minimal).expect("reducible");

        for (name, reduce) in REDUCTIONS {
            let mut retained = carried.clone();
            reduce(&corpus, &superset, &mut retained).expect("reducible");
            prop_assert!(
                total_size(&minimal) <= total_size(&retained),
                "minimal retained {} predicates, {} retained {}",
                total_size(&minimal), name, total_size(&retained)
            );
        }
    }
}

#[test]
fn every_variant_keeps_the_separating_predicate() {
    // Interval [0,2]; positive {1,1,1}; negative {0,1,1}. The maximal
    // conjunction keeps all three attributes, and every reduction must
    // retain attribute 0, the only one separating the negative.
    let corpus = Corpus::new(
        vec![
            Datapoint::classified(0, vec![true, true, true], true),
            Datapoint::classified(0, vec![false, true, true], false),
        ],
        vec![],
        vec![AttributeInterval::new(0, 2)],
    );
    let superset = horndini(&corpus).expect("feasible");
    assert_eq!(superset[0], (0..3).collect::<Conjunction>());

    for (name, reduce) in REDUCTIONS {
        let mut retained = vec![Conjunction::new()];
        reduce(&corpus, &superset, &mut retained).expect("reducible");
        assert!(retained[0].contains(&0), "{name} lost the separator");
        assert!(is_consistent(&retained, &corpus), "{name} is inconsistent");
    }
}

/// A deterministic pseudo-random subset of the superset, standing in for
/// the retained set persisted by a previous round.
fn arbitrary_carried_set(superset: &[Conjunction], seed: u64) -> Vec<Conjunction> {
    let mut state = seed | 1;
    superset
        .iter()
        .map(|conj| {
            conj.iter()
                .copied()
                .filter(|_| {
                    // xorshift64
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    state & 1 == 0
                })
                .collect()
        })
        .collect()
}
