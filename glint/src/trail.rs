//! Assignment history and the forced literal queue.

use std::collections::VecDeque;

use crate::lit::{Lit, Var};

/// Chronological record of assigned variables.
///
/// The push order is the backtrack record: popping entries and undoing
/// their assignments in reverse order restores every earlier state exactly.
/// Whether an entry was a decision or an implication lives with the
/// variable itself, in its forced flag.
#[derive(Default)]
pub struct Trail {
    steps: Vec<Var>,
}

impl Trail {
    /// Records that a variable was assigned.
    pub fn push(&mut self, var: Var) {
        self.steps.push(var);
    }

    /// Removes and returns the most recently assigned variable.
    pub fn pop(&mut self) -> Option<Var> {
        self.steps.pop()
    }

    /// Number of currently assigned variables.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no variable is assigned.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The assigned variables in assignment order.
    pub fn steps(&self) -> &[Var] {
        &self.steps
    }
}

/// FIFO queue of literals that must be assigned true.
///
/// Filled by the assignment engine when a clause becomes unit or a variable
/// becomes pure, drained by propagation. An entry is only guaranteed to be
/// over a free variable at the moment it is enqueued; stale entries are
/// filtered at dequeue. On backtrack the whole queue is dropped, since every
/// pending implication belonged to the abandoned branch.
#[derive(Default)]
pub struct ForceQueue {
    lits: VecDeque<Lit>,
}

impl ForceQueue {
    /// Appends a forced literal.
    pub fn enqueue(&mut self, lit: Lit) {
        self.lits.push_back(lit);
    }

    /// Removes and returns the oldest forced literal.
    pub fn dequeue(&mut self) -> Option<Lit> {
        self.lits.pop_front()
    }

    /// Drops all pending literals.
    pub fn clear(&mut self) {
        self.lits.clear();
    }

    /// Number of pending literals.
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Whether no literal is pending.
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }
}
