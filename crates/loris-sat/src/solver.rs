use crate::cnf::CnfFormula;

/// Result of a cardinality-bounded satisfiability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatOutcome {
    /// Satisfiable; the model maps every variable to a truth value.
    Sat(Vec<bool>),
    /// No model exists within the cardinality bound.
    Unsat,
}

impl SatOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatOutcome::Sat(_))
    }
}

/// Abstract satisfiability backend with an at-most-k cardinality bound.
///
/// `bound` caps the number of variables assigned true in any model. The
/// caller owns clause construction; backends only decide and, when
/// satisfiable, produce a witness assignment.
pub trait CardinalitySolver {
    type Error: std::error::Error;

    fn solve_with_bound(
        &mut self,
        formula: &CnfFormula,
        bound: usize,
    ) -> Result<SatOutcome, Self::Error>;
}
