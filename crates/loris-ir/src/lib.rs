#![doc = include_str!("../README.md")]

//! Loris data model.
//!
//! This crate defines the per-round corpus (datapoints, Horn constraints,
//! attribute intervals), the conjunction working type and its set algebra,
//! and proptest strategies for generating feasible corpora.

pub mod attributes;
pub mod conjunction;
pub mod corpus;
pub mod datapoint;
pub mod horn;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;

pub use attributes::{AttributeCatalog, AttributeInterval};
pub use conjunction::{satisfies, seed_conjunctions, split_retained, Conjunction};
pub use corpus::{Corpus, CorpusDefect};
pub use datapoint::{AttributeId, Datapoint, DatapointId, LocationId};
pub use horn::{ConstraintId, HornConstraint};
