//! Draining the forced literal queue.

use crate::assign::{AssignOps, Conflict};
use crate::formula::Value;

/// Applies queued forced literals until the queue drains or a conflict
/// occurs.
///
/// Dequeued literals whose variable is no longer free are skipped; the
/// counters already account for them, so a contradiction between two queued
/// literals surfaces as a regular clause conflict when the first one is
/// assigned. On conflict the queue is left populated, to be dropped at the
/// next backtrack boundary. The FIFO order only affects performance, not
/// the outcome.
pub fn propagate(ops: &mut AssignOps) -> Result<(), Conflict> {
    while let Some(lit) = ops.queue.dequeue() {
        if ops.formula.vars[lit].value != Value::Free {
            continue;
        }
        ops.assign(lit.var(), Value::satisfying(lit.is_positive()), true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::lit::{Lit, Var};
    use crate::trail::{ForceQueue, Trail};

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

    #[test]
    fn drains_a_unit_cascade() {
        let mut formula = formula![3 vars
            -1, 2;
            -2, 3;
        ];
        engine![ops, formula];

        ops.queue.enqueue(Lit::from_dimacs(1));
        assert!(propagate(&mut ops).is_ok());

        for number in 1..=3 {
            let var = Var::from_dimacs(number);
            assert_eq!(ops.formula.vars[var].value, Value::True);
            assert!(ops.formula.vars[var].forced);
        }
        assert!(ops.queue.is_empty());
        ops.formula.check_counters();
    }

    #[test]
    fn skips_stale_entries() {
        let mut formula = formula![2 vars
            1, 2;
        ];
        engine![ops, formula];

        ops.queue.enqueue(Lit::from_dimacs(1));
        ops.queue.enqueue(Lit::from_dimacs(1));
        assert!(propagate(&mut ops).is_ok());
        assert_eq!(ops.trail.len(), 1);
    }

    #[test]
    fn opposing_units_conflict() {
        let mut formula = formula![1 vars
            1;
            -1;
        ];
        engine![ops, formula];

        ops.queue.enqueue(Lit::from_dimacs(1));
        ops.queue.enqueue(Lit::from_dimacs(-1));
        assert!(propagate(&mut ops).is_err());
    }

    #[test]
    fn conflict_stops_the_drain() {
        let mut formula = formula![3 vars
            -1;
        ];
        engine![ops, formula];

        ops.queue.enqueue(Lit::from_dimacs(1));
        ops.queue.enqueue(Lit::from_dimacs(2));
        ops.queue.enqueue(Lit::from_dimacs(3));
        assert!(propagate(&mut ops).is_err());
        // The entries behind the conflicting one are still pending.
        assert_eq!(ops.queue.len(), 2);
    }
}
