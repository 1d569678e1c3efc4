//! DLIS decision heuristic.
//!
//! Dynamic Largest Individual Sum picks the free variable whose single
//! polarity occurs in the most not yet satisfied clauses, and asserts that
//! polarity. The counts come straight from the per-variable activity
//! counters the assignment engine maintains, so a decision is a linear scan
//! over the variables and never touches a clause. See ["The Impact of
//! Branching Heuristics in Propositional Satisfiability
//! Algorithms"](https://doi.org/10.1007/3-540-48159-1_5) for the heuristic
//! family.

use crate::formula::{Formula, Value};
use crate::lit::Var;

/// Picks the next decision variable and its value.
///
/// Maximizes `max(act_pos, act_neg)`; the polarity with the higher count is
/// asserted, positive winning a tie. On equal scores the variable with the
/// lowest index wins, which keeps the search deterministic. Returns `None`
/// when no variable is free, i.e. the assignment is total.
pub fn select(formula: &Formula) -> Option<(Var, Value)> {
    let mut best: Option<(Var, u32)> = None;
    for var in formula.vars.keys() {
        let state = &formula.vars[var];
        if state.value != Value::Free {
            continue;
        }
        let score = state.act_pos.max(state.act_neg);
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((var, score)),
        }
    }
    best.map(|(var, _)| {
        let state = &formula.vars[var];
        (var, Value::satisfying(state.act_pos >= state.act_neg))
    })
}
