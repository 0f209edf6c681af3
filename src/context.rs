//! Per-sequence generation context: slot and label allocation.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::types::{PrimKind, RepType};
use crate::values::{Session, Value};

/// Index of a local slot in the execution frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot(pub(crate) u32);

impl Slot {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot{}", self.0)
    }
}

/// Symbolic jump target, bound by a marker instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label(pub(crate) u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// State threaded through generation of one instruction sequence.
///
/// Slot 0 always holds the session and slot 1 the null flag; temporaries are
/// appended after them. Labels are numbered in allocation order, which keeps
/// generation deterministic for identical inputs.
#[derive(Debug)]
pub struct EvalContext {
    slot_types: Vec<RepType>,
    labels: Cell<u32>,
}

impl Default for EvalContext {
    fn default() -> EvalContext {
        EvalContext::new()
    }
}

impl EvalContext {
    pub fn new() -> EvalContext {
        EvalContext {
            slot_types: vec![RepType::Session, RepType::Prim(PrimKind::Bool)],
            labels: Cell::new(0),
        }
    }

    /// Slot holding the per-query session.
    pub fn session(&self) -> Slot {
        Slot(0)
    }

    /// Slot holding the null flag for this sequence.
    pub fn null_flag(&self) -> Slot {
        Slot(1)
    }

    /// Allocate a fresh temporary slot of the given representation.
    pub fn create_temp(&mut self, ty: RepType) -> Slot {
        let slot = Slot(self.slot_types.len() as u32);
        self.slot_types.push(ty);
        slot
    }

    /// Allocate a fresh unbound label.
    pub fn fresh_label(&self) -> Label {
        let n = self.labels.get();
        self.labels.set(n + 1);
        Label(n)
    }

    pub fn num_slots(&self) -> usize {
        self.slot_types.len()
    }

    /// Build the initial execution frame: session in place, null flag clear,
    /// temporaries at their representation defaults.
    pub fn initial_frame(&self, session: Rc<Session>) -> Vec<Value> {
        self.slot_types
            .iter()
            .enumerate()
            .map(|(i, &ty)| {
                if i == 0 {
                    Value::session(Rc::clone(&session))
                } else {
                    Value::default_of(ty).unwrap_or(Value::null())
                }
            })
            .collect()
    }
}
