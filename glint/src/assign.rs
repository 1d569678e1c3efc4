//! Assigning and unassigning single variables.
//!
//! All counter maintenance lives here. `assign` walks the two occurrence
//! lists of the assigned variable: clauses falsified by the new value lose
//! one active literal (detecting conflicts and new units on the way), and
//! clauses satisfied by it are marked with their satisfier while the active
//! occurrence counters of their other free variables drop (detecting pure
//! literals on the way). `unassign` is the exact inverse, keyed off the
//! value being retracted. Running the pair back to back leaves every
//! counter and satisfier mark untouched, which is what makes chronological
//! backtracking safe.

use std::mem;

use crate::formula::{ClauseIdx, Formula, Value};
use crate::lit::{Lit, Var};
use crate::trail::{ForceQueue, Trail};

/// A clause ran out of active literals without being satisfied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The first clause whose active count reached zero.
    pub clause: ClauseIdx,
}

/// References to all data mutated when assigning a variable.
#[allow(missing_docs)]
pub struct AssignOps<'a> {
    pub formula: &'a mut Formula,
    pub trail: &'a mut Trail,
    pub queue: &'a mut ForceQueue,
}

impl<'a> AssignOps<'a> {
    /// Assigns a free variable and updates all clause and occurrence
    /// counters.
    ///
    /// Clauses that become unit have their remaining literal enqueued, and
    /// variables that become pure have the literal of their remaining
    /// polarity enqueued. A conflict is reported when some clause runs out
    /// of active literals, but every update is still applied, so the state
    /// stays consistent and [`unassign`][Self::unassign] inverts it exactly.
    pub fn assign(&mut self, var: Var, value: Value, forced: bool) -> Result<(), Conflict> {
        debug_assert_ne!(value, Value::Free);
        debug_assert_eq!(self.formula.vars[var].value, Value::Free);

        let state = &mut self.formula.vars[var];
        state.value = value;
        state.forced = forced;
        self.trail.push(var);

        let positive = value == Value::True;
        // Both occurrence lists are detached while they are walked, so the
        // clause arena and the other variables' counters can be borrowed
        // freely.
        let falsified = mem::take(self.formula.vars[var].occ_mut(!positive));
        let satisfied = mem::take(self.formula.vars[var].occ_mut(positive));

        let mut conflict = None;

        for &index in &falsified {
            let clause = &mut self.formula.clauses[index];
            if clause.satisfied_by.is_some() {
                continue;
            }
            debug_assert!(clause.active > 0);
            clause.active -= 1;
            if clause.active == 0 {
                tracing::trace!(clause = ?index, "conflict");
                if conflict.is_none() {
                    conflict = Some(Conflict { clause: index });
                }
            } else if clause.active == 1 {
                let clause = &self.formula.clauses[index];
                let vars = &self.formula.vars;
                if let Some(&unit) = clause
                    .lits
                    .iter()
                    .find(|&&lit| vars[lit].value == Value::Free)
                {
                    self.queue.enqueue(unit);
                }
            }
        }

        for &index in &satisfied {
            if self.formula.clauses[index].satisfied_by.is_some() {
                continue;
            }
            self.formula.clauses[index].satisfied_by = Some(var);
            let clauses = &self.formula.clauses;
            let vars = &mut self.formula.vars;
            for &lit in &clauses[index].lits {
                let other = &mut vars[lit];
                if other.value != Value::Free {
                    continue;
                }
                if lit.is_positive() {
                    other.act_pos -= 1;
                    if other.act_pos == 0 && other.act_neg > 0 {
                        // Only negative occurrences are left, so the
                        // negative literal cannot falsify anything.
                        self.queue.enqueue(Lit::from_var(lit.var(), false));
                    }
                } else {
                    other.act_neg -= 1;
                    if other.act_neg == 0 && other.act_pos > 0 {
                        self.queue.enqueue(Lit::from_var(lit.var(), true));
                    }
                }
            }
        }

        let state = &mut self.formula.vars[var];
        *state.occ_mut(!positive) = falsified;
        *state.occ_mut(positive) = satisfied;

        match conflict {
            None => Ok(()),
            Some(conflict) => Err(conflict),
        }
    }

    /// Retracts the assignment of a variable, restoring every counter and
    /// satisfier mark to its value from just before the matching
    /// [`assign`][Self::assign].
    ///
    /// Assignments must be retracted in reverse assignment order. The
    /// forced flag is kept; backtracking reads it after popping the trail.
    pub fn unassign(&mut self, var: Var) {
        let value = self.formula.vars[var].value;
        debug_assert_ne!(value, Value::Free);
        let positive = value == Value::True;

        let satisfied = mem::take(self.formula.vars[var].occ_mut(positive));
        let falsified = mem::take(self.formula.vars[var].occ_mut(!positive));

        // Satisfier marks are cleared before the falsified counts are
        // restored; a clause containing both polarities of `var` must see
        // its satisfier already gone when its active count is incremented,
        // matching the decrement it got while still unsatisfied.
        for &index in &satisfied {
            if self.formula.clauses[index].satisfied_by != Some(var) {
                continue;
            }
            self.formula.clauses[index].satisfied_by = None;
            let clauses = &self.formula.clauses;
            let vars = &mut self.formula.vars;
            for &lit in &clauses[index].lits {
                let other = &mut vars[lit];
                if other.value != Value::Free {
                    continue;
                }
                if lit.is_positive() {
                    other.act_pos += 1;
                } else {
                    other.act_neg += 1;
                }
            }
        }

        for &index in &falsified {
            let clause = &mut self.formula.clauses[index];
            if clause.satisfied_by.is_none() {
                clause.active += 1;
            }
        }

        let state = &mut self.formula.vars[var];
        *state.occ_mut(positive) = satisfied;
        *state.occ_mut(!positive) = falsified;
        state.value = Value::Free;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::LitIdx;

    macro_rules! formula {
        ($var_count:literal vars $($($lit:literal),+);* $(;)?) => {{
            let mut formula = Formula::default();
            formula.set_var_count($var_count);
            $(
                formula.add_clause(&[$(Lit::from_dimacs($lit)),*]);
            )*
            formula
        }};
    }

    macro_rules! engine {
        ($ops:ident, $formula:ident) => {
            let mut trail = Trail::default();
            let mut queue = ForceQueue::default();
            let mut $ops = AssignOps {
                formula: &mut $formula,
                trail: &mut trail,
                queue: &mut queue,
            };
        };
    }

    type Snapshot = (Vec<(Option<Var>, LitIdx)>, Vec<(Value, LitIdx, LitIdx)>);

    fn snapshot(formula: &Formula) -> Snapshot {
        (
            formula
                .clauses
                .iter()
                .map(|clause| (clause.satisfied_by, clause.active))
                .collect(),
            formula
                .vars
                .iter()
                .map(|state| (state.value, state.act_pos, state.act_neg))
                .collect(),
        )
    }

    #[test]
    fn assign_marks_satisfied_and_falsified_clauses() {
        let mut formula = formula![3 vars
            1, 2;
            -1, 3;
            2, 3;
        ];
        engine![ops, formula];

        assert!(ops.assign(Var::from_dimacs(1), Value::True, false).is_ok());

        assert_eq!(
            ops.formula.clauses[ClauseIdx(0)].satisfied_by,
            Some(Var::from_dimacs(1))
        );
        assert_eq!(ops.formula.clauses[ClauseIdx(1)].satisfied_by, None);
        assert_eq!(ops.formula.clauses[ClauseIdx(1)].active, 1);
        assert_eq!(ops.trail.steps(), &[Var::from_dimacs(1)]);
        // Clause 0 is gone, so variable 2 only counts clause 2.
        assert_eq!(ops.formula.vars[Var::from_dimacs(2)].act_pos, 1);
        ops.formula.check_counters();
    }

    #[test]
    fn assign_enqueues_the_remaining_unit_literal() {
        let mut formula = formula![2 vars
            1, 2;
        ];
        engine![ops, formula];

        assert!(ops
            .assign(Var::from_dimacs(1), Value::False, false)
            .is_ok());
        assert_eq!(ops.queue.dequeue(), Some(Lit::from_dimacs(2)));
    }

    #[test]
    fn assign_enqueues_pure_literals() {
        // Satisfying the first clause removes the last positive occurrence
        // of variable 2, whose negative occurrence remains.
        let mut formula = formula![3 vars
            1, 2;
            -2, 3;
        ];
        engine![ops, formula];

        assert!(ops.assign(Var::from_dimacs(1), Value::True, false).is_ok());
        assert_eq!(ops.queue.dequeue(), Some(Lit::from_dimacs(-2)));
        assert_eq!(ops.queue.dequeue(), None);
    }

    #[test]
    fn conflict_is_reported_and_state_stays_consistent() {
        let mut formula = formula![2 vars
            -1;
            1, 2;
        ];
        engine![ops, formula];

        let result = ops.assign(Var::from_dimacs(1), Value::True, false);
        assert_eq!(result, Err(Conflict { clause: ClauseIdx(0) }));
        // The satisfying half of the update still ran.
        assert_eq!(
            ops.formula.clauses[ClauseIdx(1)].satisfied_by,
            Some(Var::from_dimacs(1))
        );
        ops.formula.check_counters();

        ops.unassign(Var::from_dimacs(1));
        ops.formula.check_counters();
    }

    #[test]
    fn unassign_restores_the_exact_prior_state() {
        let mut formula = formula![4 vars
            1, 2;
            -1, 3;
            1, 1, -4;
            1, -1, 2;
            -2, -3;
        ];
        engine![ops, formula];

        let before = snapshot(ops.formula);
        for value in [Value::True, Value::False] {
            assert!(ops.assign(Var::from_dimacs(1), value, false).is_ok());
            ops.queue.clear();
            ops.unassign(Var::from_dimacs(1));
            assert_eq!(snapshot(ops.formula), before);
            ops.formula.check_counters();
        }
    }

    #[test]
    fn nested_assignments_unwind_in_reverse_order() {
        let mut formula = formula![3 vars
            1, 2;
            -1, 3;
            2, 3;
            -2, -3;
        ];
        engine![ops, formula];

        let initial = snapshot(ops.formula);
        assert!(ops.assign(Var::from_dimacs(1), Value::True, false).is_ok());
        let after_first = snapshot(ops.formula);
        assert!(ops.assign(Var::from_dimacs(2), Value::True, true).is_ok());
        ops.queue.clear();

        ops.unassign(Var::from_dimacs(2));
        assert_eq!(snapshot(ops.formula), after_first);
        ops.unassign(Var::from_dimacs(1));
        assert_eq!(snapshot(ops.formula), initial);
        ops.formula.check_counters();
    }

    #[test]
    fn unassign_keeps_the_forced_flag() {
        let mut formula = formula![1 vars
            1;
        ];
        engine![ops, formula];

        assert!(ops.assign(Var::from_dimacs(1), Value::True, true).is_ok());
        ops.unassign(Var::from_dimacs(1));
        assert!(ops.formula.vars[Var::from_dimacs(1)].forced);
        assert_eq!(ops.formula.vars[Var::from_dimacs(1)].value, Value::Free);
    }
}
