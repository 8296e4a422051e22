//! Online linear-threshold classifiers.
//!
//! Between rounds, unclassified datapoints can be given guessed labels
//! before they re-enter the engine: each datapoint is labeled by whether it
//! satisfies a guiding conjunction (the maximal superset, or a reduced
//! retained set), then a per-location linear-threshold learner is trained
//! on the *complemented* inputs and labels: the learned function describes
//! the violation region, which for a conjunction is a plain disjunction of
//! complemented bits and therefore linearly separable.
//!
//! Training loops until the learner fits the round's sample exactly, with
//! an epoch cap to surface inseparable samples instead of spinning.

use thiserror::Error;
use tracing::debug;

use loris_ir::{Conjunction, Corpus, LocationId};

/// One complemented training example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub values: Vec<bool>,
    pub label: bool,
}

/// Classifier training failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("location {location}: sample not linearly separable within {epochs} epochs")]
    NotSeparable { location: LocationId, epochs: usize },
}

/// Multiplicative-weights learner.
#[derive(Debug, Clone)]
pub struct Winnow {
    pub weights: Vec<f32>,
    pub threshold: f32,
    rate: f32,
}

impl Winnow {
    pub fn new(width: usize) -> Self {
        Self {
            weights: vec![2.0 * width as f32 / 5.0; width],
            threshold: 0.441,
            rate: 2.4,
        }
    }

    pub fn predict(&self, values: &[bool]) -> bool {
        let sum: f32 = self
            .weights
            .iter()
            .zip(values)
            .map(|(w, &v)| if v { *w } else { 0.0 })
            .sum();
        sum >= self.threshold
    }

    /// Demote on false positives, promote on false negatives, only at
    /// positions where the input bit is set.
    fn update(&mut self, values: &[bool], label: bool, predicted: bool) {
        for (w, &v) in self.weights.iter_mut().zip(values) {
            if !v {
                continue;
            }
            if !label && predicted {
                *w /= self.rate;
            } else if label && !predicted {
                *w *= self.rate;
            }
        }
    }

    /// Train until the sample is fit exactly; false if the epoch cap is hit.
    pub fn fit(&mut self, sample: &[TrainingExample], max_epochs: usize) -> bool {
        for epoch in 0..max_epochs {
            if sample.iter().all(|ex| self.predict(&ex.values) == ex.label) {
                debug!(epoch, "winnow converged");
                return true;
            }
            for ex in sample {
                let predicted = self.predict(&ex.values);
                self.update(&ex.values, ex.label, predicted);
            }
        }
        sample.iter().all(|ex| self.predict(&ex.values) == ex.label)
    }
}

/// Additive-weights learner with a bias term.
#[derive(Debug, Clone)]
pub struct Perceptron {
    /// `weights[0]` is the bias; `weights[j + 1]` weighs input bit `j`.
    pub weights: Vec<f32>,
    pub threshold: f32,
    rate: f32,
}

impl Perceptron {
    pub fn new(width: usize) -> Self {
        Self {
            weights: vec![1.0; width + 1],
            threshold: 0.0,
            rate: 0.01,
        }
    }

    pub fn predict(&self, values: &[bool]) -> bool {
        let sum: f32 = self.weights[0]
            + self.weights[1..]
                .iter()
                .zip(values)
                .map(|(w, &v)| if v { *w } else { 0.0 })
                .sum::<f32>();
        sum >= self.threshold
    }

    fn update(&mut self, values: &[bool], label: bool, predicted: bool) {
        let step = self.rate * (label as i32 - predicted as i32) as f32;
        self.weights[0] += step;
        for (w, &v) in self.weights[1..].iter_mut().zip(values) {
            if v {
                *w += step;
            }
        }
    }

    /// Train until the sample is fit exactly; false if the epoch cap is hit.
    pub fn fit(&mut self, sample: &[TrainingExample], max_epochs: usize) -> bool {
        for epoch in 0..max_epochs {
            if sample.iter().all(|ex| self.predict(&ex.values) == ex.label) {
                debug!(epoch, "perceptron converged");
                return true;
            }
            for ex in sample {
                let predicted = self.predict(&ex.values);
                self.update(&ex.values, ex.label, predicted);
            }
        }
        sample.iter().all(|ex| self.predict(&ex.values) == ex.label)
    }
}

/// Per-location training sets: unclassified datapoints are labeled from the
/// guiding conjunction, then inputs and labels are complemented.
pub fn complemented_samples(corpus: &Corpus, guide: &[Conjunction]) -> Vec<Vec<TrainingExample>> {
    let mut samples = vec![Vec::new(); corpus.num_locations()];
    for (id, dp) in corpus.datapoints.iter().enumerate() {
        let loc = dp.location;
        let label = dp.label.unwrap_or_else(|| corpus.satisfies(id, &guide[loc]));
        samples[loc].push(TrainingExample {
            values: dp.values.iter().map(|&v| !v).collect(),
            label: !label,
        });
    }
    samples
}

/// Train one winnow per location on the complemented samples.
///
/// Predicates outside the guiding conjunction carry no signal and have
/// their weights zeroed before training; multiplicative updates keep them
/// at zero.
pub fn train_winnow(
    corpus: &Corpus,
    guide: &[Conjunction],
    max_epochs: usize,
) -> Result<Vec<Winnow>, ClassifyError> {
    let samples = complemented_samples(corpus, guide);
    let mut models = Vec::with_capacity(samples.len());
    for (location, sample) in samples.iter().enumerate() {
        let interval = corpus.intervals[location];
        let mut model = Winnow::new(interval.width());
        for (j, w) in model.weights.iter_mut().enumerate() {
            if !guide[location].contains(&(interval.lo + j)) {
                *w = 0.0;
            }
        }
        if !model.fit(sample, max_epochs) {
            return Err(ClassifyError::NotSeparable {
                location,
                epochs: max_epochs,
            });
        }
        models.push(model);
    }
    Ok(models)
}

/// Train one perceptron per location on the complemented samples.
pub fn train_perceptron(
    corpus: &Corpus,
    guide: &[Conjunction],
    max_epochs: usize,
) -> Result<Vec<Perceptron>, ClassifyError> {
    let samples = complemented_samples(corpus, guide);
    let mut models = Vec::with_capacity(samples.len());
    for (location, sample) in samples.iter().enumerate() {
        let mut model = Perceptron::new(corpus.intervals[location].width());
        if !model.fit(sample, max_epochs) {
            return Err(ClassifyError::NotSeparable {
                location,
                epochs: max_epochs,
            });
        }
        models.push(model);
    }
    Ok(models)
}
