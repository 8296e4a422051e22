use loris_ir::ConstraintId;
use thiserror::Error;

/// Failures of the learning algorithms.
///
/// Argument defects are rejected before any mutation; infeasibility and
/// solver exhaustion abort the round outright and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("attribute interval list is empty")]
    NoLocations,

    #[error("conjunction vector covers {got} locations, corpus has {expected}")]
    LocationCountMismatch { expected: usize, got: usize },

    #[error("superset conjunction vector must not be empty")]
    EmptySuperset,

    #[error("superset covers {superset} locations but retained set covers {retained}")]
    RetainedSizeMismatch { superset: usize, retained: usize },

    #[error(
        "no consistent conjunction exists: constraint {constraint} has no conclusion \
         and all of its premises are satisfied"
    )]
    Infeasible { constraint: ConstraintId },

    #[error("cardinality search exhausted all {candidates} candidate predicates without a model")]
    SolverExhausted { candidates: usize },

    #[error("satisfiability backend failed: {0}")]
    Solver(String),
}
