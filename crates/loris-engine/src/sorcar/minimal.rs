//! Minimum-cardinality reduction via bounded satisfiability search.
//!
//! Every unresolved obligation becomes a clause over "retain this
//! candidate" selection variables: an unresolved negative example must gain
//! at least one predicate at which it is false; a violated constraint must
//! have some premise falsified; and a constraint whose conclusion currently
//! holds may only lose that conclusion if a premise is falsified too (one
//! clause per conclusion-breaking candidate). The conjunction of all
//! clauses is then solved under increasing at-most-k bounds; the first
//! model is a minimum-cardinality repair.
//!
//! Exhausting the bounds up to the candidate count means the clause set is
//! unsatisfiable outright, which cannot happen when the superset itself is
//! consistent; it is reported as fatal and never retried.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use loris_sat::{CardinalitySolver, CnfFormula, DpllSolver, Lit, SatOutcome, Var};

use loris_ir::{satisfies, AttributeId, Conjunction, Corpus, LocationId};

use super::{conclusion_holds, falsifying, premises_hold, prepare};
use crate::consistency::is_consistent;
use crate::error::EngineError;

/// [`reduce_minimal_with`] using the built-in DPLL backend.
pub fn reduce_minimal(
    corpus: &Corpus,
    superset: &[Conjunction],
    retained: &mut [Conjunction],
) -> Result<(), EngineError> {
    reduce_minimal_with(corpus, superset, retained, &mut DpllSolver)
}

/// Repair the retained sets with a minimum-cardinality candidate selection
/// found through the injected satisfiability backend.
pub fn reduce_minimal_with<S: CardinalitySolver>(
    corpus: &Corpus,
    superset: &[Conjunction],
    retained: &mut [Conjunction],
    solver: &mut S,
) -> Result<(), EngineError> {
    let candidates = prepare(superset, retained)?;

    // One selection variable per candidate predicate; `selection` maps the
    // variable index back to its (location, attribute) for model decoding.
    let mut formula = CnfFormula::new();
    let mut var_of: Vec<BTreeMap<AttributeId, Var>> = vec![BTreeMap::new(); superset.len()];
    let mut selection: Vec<(LocationId, AttributeId)> = Vec::new();
    for (loc, pool) in candidates.iter().enumerate() {
        for &a in pool {
            let var = formula.fresh_var();
            var_of[loc].insert(a, var);
            selection.push((loc, a));
        }
    }
    let candidate_count = formula.num_vars();

    // Unresolved negatives: at least one falsifying candidate is retained.
    for dp in corpus.datapoints.iter().filter(|dp| dp.is_negative()) {
        let loc = dp.location;
        let interval = corpus.intervals[loc];
        if satisfies(dp, &retained[loc], interval) {
            formula.add_clause(
                falsifying(dp, interval, &candidates[loc])
                    .into_iter()
                    .map(|a| Lit::pos(var_of[loc][&a])),
            );
        }
    }

    for hc in &corpus.constraints {
        if !premises_hold(corpus, hc, retained) {
            continue;
        }

        // Candidates that would falsify some premise of this constraint.
        let mut premise_vars: BTreeSet<Var> = BTreeSet::new();
        for &p in &hc.premises {
            let dp = &corpus.datapoints[p];
            let loc = dp.location;
            for a in falsifying(dp, corpus.intervals[loc], &candidates[loc]) {
                premise_vars.insert(var_of[loc][&a]);
            }
        }
        let premise_lits: Vec<Lit> = premise_vars.into_iter().map(Lit::pos).collect();

        if !conclusion_holds(corpus, hc, retained) {
            // Live violation (or no conclusion at all): some premise must
            // stop satisfying its conjunction.
            formula.add_clause(premise_lits);
        } else if let Some(c) = hc.conclusion {
            // The conclusion holds right now; forbid the search from
            // un-satisfying it unless a premise is falsified as well.
            let dp = &corpus.datapoints[c];
            let loc = dp.location;
            for a in falsifying(dp, corpus.intervals[loc], &candidates[loc]) {
                let mut clause = premise_lits.clone();
                clause.push(Lit::neg(var_of[loc][&a]));
                formula.add_clause(clause);
            }
        }
    }

    // Search increasing cardinality bounds; the first model wins.
    let mut bound = 1usize;
    loop {
        let outcome = solver
            .solve_with_bound(&formula, bound)
            .map_err(|e| EngineError::Solver(e.to_string()))?;
        match outcome {
            SatOutcome::Sat(model) => {
                for (var, &(loc, a)) in selection.iter().enumerate() {
                    if model[var] {
                        retained[loc].insert(a);
                    }
                }
                debug!(
                    bound,
                    selected = model.iter().filter(|&&v| v).count(),
                    "cardinality search found a model"
                );
                break;
            }
            SatOutcome::Unsat => {
                if bound >= candidate_count {
                    return Err(EngineError::SolverExhausted {
                        candidates: candidate_count,
                    });
                }
                bound += 1;
            }
        }
    }

    debug_assert!(is_consistent(retained, corpus));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loris_ir::{AttributeInterval, Datapoint, HornConstraint};

    fn conj(indices: &[usize]) -> Conjunction {
        indices.iter().copied().collect()
    }

    #[test]
    fn nothing_to_repair_selects_nothing() {
        let corpus = Corpus::new(
            vec![Datapoint::classified(0, vec![false, true], false)],
            vec![],
            vec![AttributeInterval::new(0, 1)],
        );
        let superset = vec![conj(&[0, 1])];
        let mut retained = vec![conj(&[0])];
        reduce_minimal(&corpus, &superset, &mut retained).expect("reducible");
        assert_eq!(retained, vec![conj(&[0])]);
    }

    #[test]
    fn one_shared_predicate_beats_per_example_repairs() {
        // Three negatives all falsify attribute 0; any per-example repair
        // could pick three different predicates, the minimal one picks one.
        let corpus = Corpus::new(
            vec![
                Datapoint::classified(0, vec![false, false, true], false),
                Datapoint::classified(0, vec![false, true, false], false),
                Datapoint::classified(0, vec![false, true, true], false),
            ],
            vec![],
            vec![AttributeInterval::new(0, 2)],
        );
        let superset = vec![conj(&[0, 1, 2])];
        let mut retained = vec![conj(&[])];
        reduce_minimal(&corpus, &superset, &mut retained).expect("reducible");
        assert_eq!(retained, vec![conj(&[0])]);
    }

    #[test]
    fn implication_clause_protects_satisfied_conclusions() {
        // The negative falsifies attributes 1 and 3; attribute 3 would
        // break the constraint's currently satisfied conclusion without
        // falsifying the premise (the premise is true everywhere), so the
        // only bound-1 model picks attribute 1.
        let corpus = Corpus::new(
            vec![
                Datapoint::unclassified(0, vec![true, true, true, true]),
                Datapoint::unclassified(0, vec![true, true, true, false]),
                Datapoint::classified(0, vec![true, false, true, false], false),
            ],
            vec![HornConstraint::new(vec![0], Some(1))],
            vec![AttributeInterval::new(0, 3)],
        );
        let superset = vec![conj(&[0, 1, 2, 3])];
        let mut retained = vec![conj(&[])];
        reduce_minimal(&corpus, &superset, &mut retained).expect("reducible");
        assert_eq!(retained, vec![conj(&[1])]);
        assert!(is_consistent(&retained, &corpus));
    }

    #[test]
    fn breaking_a_conclusion_requires_falsifying_a_premise() {
        // Here the negative can only be fixed by attribute 3, which breaks
        // the conclusion; the model must additionally falsify the premise
        // via attribute 1, so the minimum has two predicates.
        let corpus = Corpus::new(
            vec![
                Datapoint::unclassified(0, vec![true, false, true, true]),
                Datapoint::unclassified(0, vec![true, true, true, false]),
                Datapoint::classified(0, vec![true, true, true, false], false),
            ],
            vec![HornConstraint::new(vec![0], Some(1))],
            vec![AttributeInterval::new(0, 3)],
        );
        let superset = vec![conj(&[0, 1, 2, 3])];
        let mut retained = vec![conj(&[])];
        reduce_minimal(&corpus, &superset, &mut retained).expect("reducible");
        assert_eq!(retained, vec![conj(&[1, 3])]);
        assert!(is_consistent(&retained, &corpus));
    }

    #[test]
    fn violated_conclusion_less_constraint_is_made_vacuous() {
        let corpus = Corpus::new(
            vec![Datapoint::unclassified(0, vec![true, false])],
            vec![HornConstraint::new(vec![0], None)],
            vec![AttributeInterval::new(0, 1)],
        );
        let superset = vec![conj(&[0, 1])];
        let mut retained = vec![conj(&[])];
        reduce_minimal(&corpus, &superset, &mut retained).expect("reducible");
        assert_eq!(retained, vec![conj(&[1])]);
    }

    #[test]
    fn unrepairable_corpus_exhausts_the_search() {
        // The negative satisfies the full superset, so no candidate can
        // separate it: its clause is empty and every bound is unsat.
        let corpus = Corpus::new(
            vec![Datapoint::classified(0, vec![true, true], false)],
            vec![],
            vec![AttributeInterval::new(0, 1)],
        );
        let superset = vec![conj(&[0, 1])];
        let mut retained = vec![conj(&[])];
        assert_eq!(
            reduce_minimal(&corpus, &superset, &mut retained),
            Err(EngineError::SolverExhausted { candidates: 2 })
        );
    }

    #[test]
    fn empty_superset_is_rejected() {
        let corpus = Corpus::new(vec![], vec![], vec![]);
        let mut retained: Vec<Conjunction> = vec![];
        assert_eq!(
            reduce_minimal(&corpus, &[], &mut retained),
            Err(EngineError::EmptySuperset)
        );
    }
}
