//! Error types for code generation and for the reference interpreter.

use thiserror::Error;

use crate::binder::BindingId;
use crate::context::{Label, Slot};
use crate::types::RepType;

/// Generation-time failures.
///
/// These indicate a missing codegen case, never a data-dependent runtime
/// condition. Generation of the enclosing expression is aborted; nothing is
/// retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("boxing not implemented for {0:?}")]
    UnsupportedBoxing(RepType),

    #[error("unboxing not implemented for {0:?}")]
    UnsupportedUnboxing(RepType),
}

/// Faults raised while executing generated instructions.
///
/// NULL handling never surfaces here: a NULL result is the null flag plus a
/// representation default baked into the generated code.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("operand stack underflow")]
    StackUnderflow,

    #[error("expected {expected} on the operand stack, found {found}")]
    RepConfusion {
        expected: &'static str,
        found: &'static str,
    },

    #[error("jump to unbound label {0}")]
    UnboundLabel(Label),

    #[error("undefined local slot {0}")]
    UndefinedSlot(Slot),

    #[error("call site {0} not resolved by the linker")]
    UnresolvedCallSite(BindingId),

    #[error("null reference unboxed on a non-null path")]
    NullUnbox,

    #[error("callable fault: {0}")]
    Fault(String),
}
