//! Output write sequence generation.

use crate::binder::{self, CallSiteBinder};
use crate::block::{Block, IfStatement};
use crate::context::EvalContext;
use crate::types::{ColumnType, RepType};
use crate::values::Value;
use crate::vm::Instruction;

/// Generate the write sequence appending a computed value to a column sink.
///
/// Expects the sink on the stack below the computed value (no value for
/// void-like columns) and the null flag describing the value. Exactly one
/// entry is appended per execution: a null marker when the flag is set or the
/// column type is void-like, the value otherwise.
///
/// The write call expects `[type, sink, value]`, so the non-null path parks
/// the two operands in temporaries and reloads them around the bound type
/// constant.
pub fn generate_write(
    binder: &mut CallSiteBinder,
    cx: &mut EvalContext,
    target: ColumnType,
) -> Block {
    let rep = target.rep();

    let mut block = Block::new();
    if rep == RepType::Void {
        block.instr(Instruction::AppendNull);
        return block;
    }

    let temp_value = cx.create_temp(rep);
    let temp_output = cx.create_temp(RepType::Ref);

    let mut condition = Block::new();
    condition.get_null_flag(cx);

    let mut was_null = Block::new();
    was_null.pop(rep).instr(Instruction::AppendNull);

    let type_binding = binder.bind_constant(Value::type_meta(target), RepType::Ref);

    let mut not_null = Block::new();
    not_null
        .put_slot(temp_value)
        .put_slot(temp_output)
        .append(binder::load_constant(&type_binding))
        .get_slot(temp_output)
        .get_slot(temp_value)
        .instr(Instruction::Write);

    block.append_if(
        IfStatement::new(condition)
            .if_true(was_null)
            .if_false(not_null),
    );
    block
}
