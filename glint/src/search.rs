//! Chronological DPLL search.
//!
//! The driver alternates decisions and propagation. A conflict unwinds the
//! trail to the most recent free decision, asserts its other value as a
//! forced assignment and resumes; a flipped branch that fails immediately
//! keeps unwinding. The search answers unsatisfiable when the trail runs
//! out before a flip succeeds, and satisfiable when no free variable is
//! left, which by the counter invariants means every clause is satisfied.

use std::fmt;
use std::time::Instant;

use crate::assign::{AssignOps, Conflict};
use crate::dlis;
use crate::formula::Formula;
use crate::lit::Lit;
use crate::prop;
use crate::trail::{ForceQueue, Trail};

/// Final answer of a solve run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A satisfying assignment was found; the formula's variables carry it.
    Sat,
    /// The search space is exhausted; no satisfying assignment exists.
    Unsat,
    /// The deadline passed before the search finished.
    Timeout,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Sat => "SAT",
            Verdict::Unsat => "UNSAT",
            Verdict::Timeout => "TIMEOUT",
        })
    }
}

/// DPLL search data structures.
#[derive(Default)]
#[allow(missing_docs)]
pub struct Search {
    pub formula: Formula,
    pub trail: Trail,
    pub queue: ForceQueue,
    pub stats: SearchStats,
}

impl Search {
    /// Current number of variables.
    pub fn var_count(&self) -> usize {
        self.formula.var_count()
    }

    /// Changes the number of variables.
    pub fn set_var_count(&mut self, var_count: usize) {
        self.formula.set_var_count(var_count);
    }

    /// Adds a clause, queueing the literal of a one-literal clause for the
    /// initial propagation round.
    pub fn add_clause(&mut self, lits: &[Lit]) {
        if let Some(unit) = self.formula.add_clause(lits) {
            self.queue.enqueue(unit);
        }
    }

    /// Runs the search to a verdict.
    ///
    /// The deadline is checked once per decision; a single propagation
    /// round can run past it, which is bounded by the number of clauses.
    pub fn search(&mut self, deadline: Option<Instant>) -> Verdict {
        if self.formula.has_empty_clause() {
            tracing::debug!("empty clause in input");
            return Verdict::Unsat;
        }
        // Digest the syntactic units queued while the formula was built.
        if self.propagate().is_err() {
            tracing::debug!("conflict in root propagation");
            return Verdict::Unsat;
        }
        loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    tracing::debug!("deadline exceeded");
                    return Verdict::Timeout;
                }
            }
            let (var, value) = match dlis::select(&self.formula) {
                Some(decision) => decision,
                None => {
                    tracing::debug!("all variables assigned");
                    return Verdict::Sat;
                }
            };
            self.stats.decisions += 1;
            tracing::trace!(?var, ?value, "decision");
            let decided = self.ops().assign(var, value, false);
            if decided.is_err() || self.propagate().is_err() {
                self.stats.conflicts += 1;
                if !self.backtrack() {
                    tracing::debug!("no flippable decision left");
                    return Verdict::Unsat;
                }
            }
        }
    }

    /// Drains the force queue, counting the applied assignments.
    fn propagate(&mut self) -> Result<(), Conflict> {
        let assigned_before = self.trail.len();
        let result = prop::propagate(&mut self.ops());
        self.stats.propagations += (self.trail.len() - assigned_before) as u64;
        result
    }

    /// Unwinds the trail to the most recent free decision and asserts its
    /// other value.
    ///
    /// The flipped assignment is marked forced so it can never be flipped
    /// back; if it conflicts, directly or through propagation, unwinding
    /// continues to the next free decision. Returns `false` when the trail
    /// is exhausted, i.e. the formula is unsatisfiable.
    fn backtrack(&mut self) -> bool {
        while let Some(var) = self.trail.pop() {
            let state = &self.formula.vars[var];
            let was_forced = state.forced;
            let flipped = state.value.flipped();
            self.ops().unassign(var);
            if was_forced {
                continue;
            }
            // Pending implications belong to the branch being abandoned.
            self.queue.clear();
            tracing::trace!(?var, ?flipped, "flip");
            if self.ops().assign(var, flipped, true).is_err() {
                self.stats.conflicts += 1;
                continue;
            }
            if self.propagate().is_err() {
                self.stats.conflicts += 1;
                continue;
            }
            return true;
        }
        false
    }

    fn ops(&mut self) -> AssignOps<'_> {
        AssignOps {
            formula: &mut self.formula,
            trail: &mut self.trail,
            queue: &mut self.queue,
        }
    }
}

/// Counters for the search loop.
#[derive(Default, Debug)]
pub struct SearchStats {
    /// Total number of free decisions.
    pub decisions: u64,
    /// Total number of conflicts, including failed flips.
    pub conflicts: u64,
    /// Total number of assignments applied by propagation.
    pub propagations: u64,
}
