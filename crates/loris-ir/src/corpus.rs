use thiserror::Error;

use crate::attributes::AttributeInterval;
use crate::conjunction::{satisfies, Conjunction};
use crate::datapoint::{AttributeId, Datapoint, DatapointId, LocationId};
use crate::horn::{ConstraintId, HornConstraint};

/// The per-round example corpus.
///
/// Owns every datapoint and Horn constraint for one learning round;
/// constraints reference datapoints by arena index. The corpus is read-only
/// once loaded; algorithms mutate only their own conjunction vectors and
/// transient working copies.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub datapoints: Vec<Datapoint>,
    pub constraints: Vec<HornConstraint>,
    /// Attribute interval per location; the location count is implicit in
    /// this list's length.
    pub intervals: Vec<AttributeInterval>,
}

/// A cross-reference defect found by [`Corpus::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusDefect {
    #[error("no attribute intervals are defined")]
    NoIntervals,
    #[error("interval for location {location} is inverted ({lo} > {hi})")]
    InvertedInterval {
        location: LocationId,
        lo: AttributeId,
        hi: AttributeId,
    },
    #[error("datapoint {datapoint} references location {location}, but only {locations} locations exist")]
    LocationOutOfRange {
        datapoint: DatapointId,
        location: LocationId,
        locations: usize,
    },
    #[error("datapoint {datapoint} carries {got} values, location {location} expects {expected}")]
    WidthMismatch {
        datapoint: DatapointId,
        location: LocationId,
        expected: usize,
        got: usize,
    },
    #[error("constraint {constraint} premise references datapoint {datapoint}, but only {datapoints} exist")]
    PremiseOutOfRange {
        constraint: ConstraintId,
        datapoint: DatapointId,
        datapoints: usize,
    },
    #[error("constraint {constraint} conclusion references datapoint {datapoint}, but only {datapoints} exist")]
    ConclusionOutOfRange {
        constraint: ConstraintId,
        datapoint: DatapointId,
        datapoints: usize,
    },
}

impl Corpus {
    pub fn new(
        datapoints: Vec<Datapoint>,
        constraints: Vec<HornConstraint>,
        intervals: Vec<AttributeInterval>,
    ) -> Self {
        Self {
            datapoints,
            constraints,
            intervals,
        }
    }

    pub fn num_locations(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the referenced datapoint satisfies the given conjunction
    /// under its own location's interval.
    pub fn satisfies(&self, id: DatapointId, conjunction: &Conjunction) -> bool {
        let dp = &self.datapoints[id];
        satisfies(dp, conjunction, self.intervals[dp.location])
    }

    /// Cross-reference validation, run once after loading and before any
    /// algorithm touches the corpus. Returns every defect found.
    pub fn validate(&self) -> Vec<CorpusDefect> {
        let mut defects = Vec::new();

        if self.intervals.is_empty() {
            defects.push(CorpusDefect::NoIntervals);
        }
        for (location, iv) in self.intervals.iter().enumerate() {
            if iv.lo > iv.hi {
                defects.push(CorpusDefect::InvertedInterval {
                    location,
                    lo: iv.lo,
                    hi: iv.hi,
                });
            }
        }

        for (id, dp) in self.datapoints.iter().enumerate() {
            if dp.location >= self.intervals.len() {
                defects.push(CorpusDefect::LocationOutOfRange {
                    datapoint: id,
                    location: dp.location,
                    locations: self.intervals.len(),
                });
                continue;
            }
            let expected = self.intervals[dp.location].width();
            if dp.values.len() != expected {
                defects.push(CorpusDefect::WidthMismatch {
                    datapoint: id,
                    location: dp.location,
                    expected,
                    got: dp.values.len(),
                });
            }
        }

        for (id, hc) in self.constraints.iter().enumerate() {
            for &p in &hc.premises {
                if p >= self.datapoints.len() {
                    defects.push(CorpusDefect::PremiseOutOfRange {
                        constraint: id,
                        datapoint: p,
                        datapoints: self.datapoints.len(),
                    });
                }
            }
            if let Some(c) = hc.conclusion {
                if c >= self.datapoints.len() {
                    defects.push(CorpusDefect::ConclusionOutOfRange {
                        constraint: id,
                        datapoint: c,
                        datapoints: self.datapoints.len(),
                    });
                }
            }
        }

        defects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_corpus() -> Corpus {
        Corpus::new(
            vec![
                Datapoint::classified(0, vec![true, true], true),
                Datapoint::classified(1, vec![false], false),
            ],
            vec![HornConstraint::new(vec![0], Some(1))],
            vec![AttributeInterval::new(0, 1), AttributeInterval::new(2, 2)],
        )
    }

    #[test]
    fn valid_corpus_has_no_defects() {
        assert!(small_corpus().validate().is_empty());
    }

    #[test]
    fn satisfies_resolves_arena_ids() {
        let corpus = small_corpus();
        let conj: Conjunction = [0, 1].into_iter().collect();
        assert!(corpus.satisfies(0, &conj));
        let conj: Conjunction = [2].into_iter().collect();
        assert!(!corpus.satisfies(1, &conj));
    }

    #[test]
    fn detects_missing_intervals() {
        let corpus = Corpus::default();
        assert_eq!(corpus.validate(), vec![CorpusDefect::NoIntervals]);
    }

    #[test]
    fn detects_location_and_width_defects() {
        let mut corpus = small_corpus();
        corpus.datapoints.push(Datapoint::unclassified(9, vec![]));
        corpus.datapoints.push(Datapoint::unclassified(0, vec![true]));
        let defects = corpus.validate();
        assert!(defects.contains(&CorpusDefect::LocationOutOfRange {
            datapoint: 2,
            location: 9,
            locations: 2,
        }));
        assert!(defects.contains(&CorpusDefect::WidthMismatch {
            datapoint: 3,
            location: 0,
            expected: 2,
            got: 1,
        }));
    }

    #[test]
    fn detects_dangling_constraint_references() {
        let mut corpus = small_corpus();
        corpus.constraints.push(HornConstraint::new(vec![7], None));
        corpus.constraints.push(HornConstraint::new(vec![0], Some(8)));
        let defects = corpus.validate();
        assert!(defects.contains(&CorpusDefect::PremiseOutOfRange {
            constraint: 1,
            datapoint: 7,
            datapoints: 2,
        }));
        assert!(defects.contains(&CorpusDefect::ConclusionOutOfRange {
            constraint: 2,
            datapoint: 8,
            datapoints: 2,
        }));
    }

    #[test]
    fn detects_inverted_interval() {
        let corpus = Corpus::new(vec![], vec![], vec![AttributeInterval { lo: 3, hi: 1 }]);
        assert_eq!(
            corpus.validate(),
            vec![CorpusDefect::InvertedInterval {
                location: 0,
                lo: 3,
                hi: 1,
            }]
        );
    }
}
