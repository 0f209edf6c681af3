//! Flat instruction set targeted by the generators.

use static_assertions::const_assert;

use crate::binder::BindingId;
use crate::context::{Label, Slot};
use crate::types::{PrimKind, RepType};

/// One lowered instruction.
///
/// Branches are symbolic: a jump names a label and `Mark` binds it. The
/// interpreter resolves labels in a pre-scan; `Mark` itself executes as a
/// no-op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    /// Bind a label to this position.
    Mark(Label),
    Jump(Label),
    /// Pop a bool; jump when it is false.
    JumpIfFalse(Label),
    /// Pop a reference; jump when it is not the null reference.
    JumpIfNotNull(Label),

    PushLong(i64),
    PushDouble(f64),
    PushBool(bool),
    /// Push the null reference.
    PushNull,
    /// Push the representation default of a type.
    PushDefault(RepType),
    Pop,
    Dup,

    LoadSlot(Slot),
    StoreSlot(Slot),

    /// Checked reference cast; fails execution on a representation mismatch.
    Cast(RepType),
    BoxPrim(PrimKind),
    UnboxPrim(PrimKind),

    /// Invoke the bound call site; constants are zero-argument sites.
    Invoke(BindingId),

    /// Pop value, sink and type metadata; append the value to the sink.
    Write,
    /// Pop a sink; append a null marker to it.
    AppendNull,
}

const_assert!(core::mem::size_of::<Instruction>() <= 16);
