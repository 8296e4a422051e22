//! Built-in DPLL backend.
//!
//! A plain backtracking search with unit propagation. The cardinality bound
//! is enforced during search: assigning a variable true past the bound is a
//! conflict, and the false-first branching order finds small models without
//! an explicit counting encoding.

use std::convert::Infallible;

use crate::cnf::{CnfFormula, Lit, Var};
use crate::solver::{CardinalitySolver, SatOutcome};

/// Backtracking DPLL search with unit propagation and cardinality pruning.
#[derive(Debug, Clone, Copy, Default)]
pub struct DpllSolver;

impl CardinalitySolver for DpllSolver {
    type Error = Infallible;

    fn solve_with_bound(
        &mut self,
        formula: &CnfFormula,
        bound: usize,
    ) -> Result<SatOutcome, Self::Error> {
        let mut search = Search {
            clauses: formula.clauses(),
            assignment: vec![None; formula.num_vars()],
            trail: Vec::new(),
            true_count: 0,
            bound,
        };
        Ok(if search.solve() {
            // Unassigned variables default to false; the bound only counts
            // true assignments, so the default can never exceed it.
            SatOutcome::Sat(
                search
                    .assignment
                    .iter()
                    .map(|v| v.unwrap_or(false))
                    .collect(),
            )
        } else {
            SatOutcome::Unsat
        })
    }
}

enum Scan {
    /// Every clause is satisfied under the partial assignment.
    Satisfied,
    /// Some clause has all literals assigned false.
    Conflict,
    /// Some clause has exactly one unassigned literal left.
    Unit(Lit),
    /// No unit or conflict; branch on this variable.
    Branch(Var),
}

struct Search<'a> {
    clauses: &'a [Vec<Lit>],
    assignment: Vec<Option<bool>>,
    trail: Vec<Var>,
    true_count: usize,
    bound: usize,
}

impl Search<'_> {
    fn solve(&mut self) -> bool {
        let mark = self.trail.len();
        loop {
            match self.scan() {
                Scan::Satisfied => return true,
                Scan::Conflict => {
                    self.undo_to(mark);
                    return false;
                }
                Scan::Unit(lit) => {
                    if !self.assign(lit.var, lit.positive) {
                        self.undo_to(mark);
                        return false;
                    }
                }
                Scan::Branch(var) => {
                    // False first: smaller models satisfy the bound sooner.
                    for value in [false, true] {
                        if self.assign(var, value) {
                            if self.solve() {
                                return true;
                            }
                            self.undo_one();
                        }
                    }
                    self.undo_to(mark);
                    return false;
                }
            }
        }
    }

    fn scan(&self) -> Scan {
        let mut branch: Option<Var> = None;
        for clause in self.clauses {
            let mut satisfied = false;
            let mut first_unassigned: Option<Lit> = None;
            let mut unassigned = 0usize;
            for &lit in clause {
                match self.assignment[lit.var] {
                    Some(value) => {
                        if lit.eval(value) {
                            satisfied = true;
                            break;
                        }
                    }
                    None => {
                        if first_unassigned.is_none() {
                            first_unassigned = Some(lit);
                        }
                        unassigned += 1;
                    }
                }
            }
            if satisfied {
                continue;
            }
            match (unassigned, first_unassigned) {
                (0, _) => return Scan::Conflict,
                (1, Some(lit)) => return Scan::Unit(lit),
                (_, Some(lit)) => {
                    if branch.is_none() {
                        branch = Some(lit.var);
                    }
                }
                // Unassigned count is nonzero exactly when a literal was seen.
                (_, None) => return Scan::Conflict,
            }
        }
        match branch {
            Some(var) => Scan::Branch(var),
            None => Scan::Satisfied,
        }
    }

    /// Record an assignment; refuses a true assignment past the bound.
    fn assign(&mut self, var: Var, value: bool) -> bool {
        debug_assert!(self.assignment[var].is_none());
        if value && self.true_count == self.bound {
            return false;
        }
        self.assignment[var] = Some(value);
        if value {
            self.true_count += 1;
        }
        self.trail.push(var);
        true
    }

    fn undo_one(&mut self) {
        if let Some(var) = self.trail.pop() {
            if self.assignment[var] == Some(true) {
                self.true_count -= 1;
            }
            self.assignment[var] = None;
        }
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            self.undo_one();
        }
    }
}
