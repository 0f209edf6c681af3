//! Raw/boxed representation conversion.

use crate::block::{Block, IfStatement};
use crate::context::EvalContext;
use crate::error::CodegenError;
use crate::types::{PrimKind, RepType};
use crate::vm::Instruction;

/// Box the raw primitive on top of the stack; references pass through
/// untouched. Only the kinds the engine boxes are supported.
pub fn box_primitive(ty: RepType) -> Result<Block, CodegenError> {
    let mut block = Block::new();
    match ty {
        RepType::Prim(kind @ (PrimKind::Long | PrimKind::Double | PrimKind::Bool)) => {
            block.instr(Instruction::BoxPrim(kind));
        }
        RepType::Prim(_) => return Err(CodegenError::UnsupportedBoxing(ty)),
        _ => {}
    }
    Ok(block)
}

/// Unwrap the boxed value on top of the stack to the raw primitive
/// `unboxed_ty`. The value must be non-null; generated code only calls this
/// on paths proven non-null.
pub fn unbox_primitive(unboxed_ty: RepType) -> Result<Block, CodegenError> {
    let mut block = Block::new();
    match unboxed_ty {
        RepType::Prim(kind @ (PrimKind::Long | PrimKind::Double | PrimKind::Bool)) => {
            block.instr(Instruction::UnboxPrim(kind));
        }
        _ => return Err(CodegenError::UnsupportedUnboxing(unboxed_ty)),
    }
    Ok(block)
}

/// Conditional boxing for a nullable argument declared as `ty`.
///
/// The flag is re-checked at runtime: when set, the raw default on the stack
/// is replaced with the null reference (cast to the declared wrapper), when
/// clear the raw value is boxed. Non-wrapper declarations need no adaptation.
pub fn box_if_necessary(cx: &EvalContext, ty: RepType) -> Result<Block, CodegenError> {
    let RepType::BoxedPrim(kind) = ty else {
        return Ok(Block::new());
    };

    let mut condition = Block::new();
    condition.get_null_flag(cx);

    let mut was_null = Block::new();
    was_null.pop(RepType::Prim(kind)).push_null().cast(ty);

    let not_null = box_primitive(RepType::Prim(kind))?;

    let mut block = Block::new();
    block.append_if(
        IfStatement::new(condition)
            .if_true(was_null)
            .if_false(not_null),
    );
    Ok(block)
}
