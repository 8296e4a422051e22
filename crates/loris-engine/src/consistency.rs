//! Post-condition checking of learned conjunction vectors.
//!
//! Pure over the corpus: every classified datapoint must be classified
//! correctly by its location's conjunction, and every Horn constraint whose
//! premises all hold must have a satisfied conclusion. A violation on the
//! output of a learning algorithm signals a defect in the algorithm, not in
//! the input; callers treat it as fatal.

use std::fmt;

use loris_ir::{Conjunction, ConstraintId, Corpus, DatapointId};

/// A single consistency violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A classified datapoint's `satisfies` result disagrees with its label.
    Misclassified {
        datapoint: DatapointId,
        expected: bool,
    },
    /// Premises all hold but the conclusion does not (or does not exist).
    BrokenImplication { constraint: ConstraintId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Misclassified {
                datapoint,
                expected,
            } => write!(
                f,
                "datapoint {datapoint} should be classified {expected} but is not"
            ),
            Violation::BrokenImplication { constraint } => write!(
                f,
                "constraint {constraint} has satisfied premises but an unsatisfied conclusion"
            ),
        }
    }
}

/// First violation of the conjunction vector against the corpus, if any.
pub fn first_violation(conjunctions: &[Conjunction], corpus: &Corpus) -> Option<Violation> {
    for (id, dp) in corpus.datapoints.iter().enumerate() {
        if let Some(label) = dp.label {
            if corpus.satisfies(id, &conjunctions[dp.location]) != label {
                return Some(Violation::Misclassified {
                    datapoint: id,
                    expected: label,
                });
            }
        }
    }

    for (id, hc) in corpus.constraints.iter().enumerate() {
        let premises_hold = hc
            .premises
            .iter()
            .all(|&p| corpus.satisfies(p, &conjunctions[corpus.datapoints[p].location]));
        if !premises_hold {
            continue;
        }
        let conclusion_holds = hc
            .conclusion
            .map(|c| corpus.satisfies(c, &conjunctions[corpus.datapoints[c].location]))
            .unwrap_or(false);
        if !conclusion_holds {
            return Some(Violation::BrokenImplication { constraint: id });
        }
    }

    None
}

/// Whether the conjunction vector is consistent with the whole corpus.
pub fn is_consistent(conjunctions: &[Conjunction], corpus: &Corpus) -> bool {
    first_violation(conjunctions, corpus).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loris_ir::{AttributeInterval, Datapoint, HornConstraint};

    fn conj(indices: &[usize]) -> Conjunction {
        indices.iter().copied().collect()
    }

    #[test]
    fn consistent_vector_passes() {
        let corpus = Corpus::new(
            vec![
                Datapoint::classified(0, vec![true, true, true], true),
                Datapoint::classified(0, vec![false, true, true], false),
            ],
            vec![],
            vec![AttributeInterval::new(0, 2)],
        );
        assert!(is_consistent(&[conj(&[0])], &corpus));
    }

    #[test]
    fn detects_misclassified_negative() {
        let corpus = Corpus::new(
            vec![Datapoint::classified(0, vec![false, true], false)],
            vec![],
            vec![AttributeInterval::new(0, 1)],
        );
        // The empty conjunction classifies everything positive.
        assert_eq!(
            first_violation(&[conj(&[])], &corpus),
            Some(Violation::Misclassified {
                datapoint: 0,
                expected: false,
            })
        );
    }

    #[test]
    fn detects_misclassified_positive() {
        let corpus = Corpus::new(
            vec![Datapoint::classified(0, vec![false, true], true)],
            vec![],
            vec![AttributeInterval::new(0, 1)],
        );
        assert_eq!(
            first_violation(&[conj(&[0])], &corpus),
            Some(Violation::Misclassified {
                datapoint: 0,
                expected: true,
            })
        );
    }

    #[test]
    fn unclassified_datapoints_are_ignored() {
        let corpus = Corpus::new(
            vec![Datapoint::unclassified(0, vec![false])],
            vec![],
            vec![AttributeInterval::new(0, 0)],
        );
        assert!(is_consistent(&[conj(&[0])], &corpus));
    }

    #[test]
    fn detects_broken_implication() {
        let corpus = Corpus::new(
            vec![
                Datapoint::unclassified(0, vec![true]),
                Datapoint::unclassified(1, vec![false]),
            ],
            vec![HornConstraint::new(vec![0], Some(1))],
            vec![AttributeInterval::new(0, 0), AttributeInterval::new(1, 1)],
        );
        // Premise holds under {0}; conclusion is false at attribute 1.
        assert_eq!(
            first_violation(&[conj(&[0]), conj(&[1])], &corpus),
            Some(Violation::BrokenImplication { constraint: 0 })
        );
        // Dropping attribute 1 satisfies the conclusion vacuously.
        assert!(is_consistent(&[conj(&[0]), conj(&[])], &corpus));
    }

    #[test]
    fn conclusion_less_constraint_with_satisfied_premises_violates() {
        let corpus = Corpus::new(
            vec![Datapoint::unclassified(0, vec![true])],
            vec![HornConstraint::new(vec![0], None)],
            vec![AttributeInterval::new(0, 0)],
        );
        assert_eq!(
            first_violation(&[conj(&[])], &corpus),
            Some(Violation::BrokenImplication { constraint: 0 })
        );
    }

    #[test]
    fn vacuous_constraints_are_fine() {
        let corpus = Corpus::new(
            vec![Datapoint::unclassified(0, vec![false])],
            vec![HornConstraint::new(vec![0], None)],
            vec![AttributeInterval::new(0, 0)],
        );
        assert!(is_consistent(&[conj(&[0])], &corpus));
    }
}
