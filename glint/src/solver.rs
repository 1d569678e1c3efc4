//! Complete solver interface.
//!
//! Groups all components necessary for one solve run.

use std::time::{Duration, Instant};

use crate::formula::Value;
use crate::lit::{Lit, Var};
use crate::search::{Search, Verdict};

/// A solver instance for a single formula.
#[derive(Default)]
pub struct Solver {
    /// Search state, exposed for inspection by the front end and tests.
    pub search: Search,
}

impl Solver {
    /// Current number of variables.
    pub fn var_count(&self) -> usize {
        self.search.var_count()
    }

    /// Changes the number of variables.
    pub fn set_var_count(&mut self, var_count: usize) {
        self.search.set_var_count(var_count);
    }

    /// Adds a clause to the formula.
    pub fn add_clause(&mut self, lits: &[Lit]) {
        self.search.add_clause(lits);
    }

    /// Runs the search under an optional wall clock limit.
    ///
    /// Returns the verdict and the elapsed time, which is `None` exactly on
    /// timeout. On [`Verdict::Sat`] the formula's variables carry the
    /// satisfying assignment; on the other verdicts the variable values are
    /// meaningless.
    pub fn solve(&mut self, timeout: Option<Duration>) -> (Verdict, Option<Duration>) {
        let start = Instant::now();
        let deadline = timeout.map(|limit| start + limit);
        let verdict = self.search.search(deadline);
        let elapsed = match verdict {
            Verdict::Timeout => None,
            Verdict::Sat | Verdict::Unsat => Some(start.elapsed()),
        };
        (verdict, elapsed)
    }

    /// Current assignment of a variable.
    pub fn value(&self, var: Var) -> Value {
        self.search.formula.value(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_elapsed_time_on_a_verdict() {
        let mut solver = Solver::default();
        solver.set_var_count(1);
        solver.add_clause(&[Lit::from_dimacs(1)]);
        let (verdict, elapsed) = solver.solve(None);
        assert_eq!(verdict, Verdict::Sat);
        assert!(elapsed.is_some());
        assert_eq!(solver.value(Var::from_dimacs(1)), Value::True);
    }

    #[test]
    fn zero_timeout_reports_timeout_without_elapsed() {
        let mut solver = Solver::default();
        solver.set_var_count(2);
        solver.add_clause(&[Lit::from_dimacs(1), Lit::from_dimacs(2)]);
        let (verdict, elapsed) = solver.solve(Some(Duration::ZERO));
        assert_eq!(verdict, Verdict::Timeout);
        assert_eq!(elapsed, None);
    }
}
