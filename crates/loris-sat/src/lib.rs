#![doc = include_str!("../README.md")]

pub mod cnf;
pub mod dpll;
pub mod solver;

pub use cnf::{CnfFormula, Lit, Var};
pub use dpll::DpllSolver;
pub use solver::{CardinalitySolver, SatOutcome};
