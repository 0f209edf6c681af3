//! Null-flag branch sequences.
//!
//! The null flag protocol: after any sub-sequence that can produce NULL, the
//! flag slot says whether the value on the stack is a real result or a
//! representation default. These helpers build the standard reaction: if the
//! flag is set, discard the partial operand stack, push the enclosing
//! expression's default and jump to its join point.

use smallvec::SmallVec;

use crate::block::{Block, IfStatement};
use crate::context::{EvalContext, Label};
use crate::types::RepType;

/// If the null flag is set: pop `stack_types`, push the default of
/// `return_type` and jump to `label`. The flag is left set.
pub fn if_null_pop_and_goto(
    cx: &EvalContext,
    label: Label,
    return_type: RepType,
    stack_types: impl IntoIterator<Item = RepType>,
) -> Block {
    handle_null_value(cx, label, return_type, stack_types.into_iter().collect(), false)
}

/// Same as [`if_null_pop_and_goto`], but the flag is cleared as part of the
/// check so the enclosing expression observes a non-null default.
pub fn if_null_clear_pop_and_goto(
    cx: &EvalContext,
    label: Label,
    return_type: RepType,
    stack_types: impl IntoIterator<Item = RepType>,
) -> Block {
    handle_null_value(cx, label, return_type, stack_types.into_iter().collect(), true)
}

fn handle_null_value(
    cx: &EvalContext,
    label: Label,
    return_type: RepType,
    stack_types: SmallVec<[RepType; 8]>,
    clear_null_flag: bool,
) -> Block {
    let mut condition = Block::new();
    condition.get_null_flag(cx);
    if clear_null_flag {
        // The store runs on both outcomes; rewriting false over false is a
        // no-op on the untaken path.
        condition.set_null_flag(cx, false);
    }

    let mut if_true = Block::new();
    for ty in stack_types {
        if_true.pop(ty);
    }
    if_true.push_default(return_type).goto_label(label);

    let mut block = Block::new();
    block.append_if(IfStatement::new(condition).if_true(if_true));
    block
}
