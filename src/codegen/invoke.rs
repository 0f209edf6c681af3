//! Invocation sequence generation.

use smallvec::SmallVec;

use crate::binder::{self, Binding};
use crate::block::Block;
use crate::codegen::nullcheck::if_null_pop_and_goto;
use crate::codegen::repr::{box_if_necessary, unbox_primitive};
use crate::context::EvalContext;
use crate::descriptor::{FunctionDescriptor, Parameter};
use crate::error::CodegenError;
use crate::types::RepType;

/// Generate the full invocation sequence for one scalar function call.
///
/// `arguments` holds one pre-compiled sequence per value parameter, in
/// declaration order; each leaves its value on the stack and reports NULL
/// through the flag. Context parameters are filled from the session slot.
///
/// Non-nullable parameters fail fast: a set flag after the argument discards
/// everything accumulated so far and skips to the end with the return
/// default. Nullable parameters are conditionally boxed and the flag cleared,
/// so the callable observes NULL as the null reference. A nullable return
/// comes back boxed and is unwrapped into flag-plus-default form.
pub fn generate_invocation(
    cx: &EvalContext,
    function: &FunctionDescriptor,
    arguments: Vec<Block>,
    binding: &Binding,
) -> Result<Block, CodegenError> {
    assert_eq!(
        arguments.len(),
        function.arg_count(),
        "argument sequence count does not match descriptor (expression compiler bug)"
    );
    tracing::trace!(
        name = %binding.signature().name(),
        args = arguments.len(),
        "generating invocation"
    );

    let end = cx.fresh_label();
    let unboxed_return = function.return_type().unboxed();

    let mut block = Block::new();
    let mut arguments = arguments.into_iter();
    let mut stack_types: SmallVec<[RepType; 8]> = SmallVec::new();

    for &param in function.params() {
        stack_types.push(param.rep());
        match param {
            Parameter::Session => {
                block.get_slot(cx.session());
            }
            Parameter::Arg { ty, nullable } => {
                block.append(arguments.next().expect("checked arity above"));
                if nullable {
                    block.append(box_if_necessary(cx, ty)?);
                    block.set_null_flag(cx, false);
                } else {
                    block.append(if_null_pop_and_goto(
                        cx,
                        end,
                        unboxed_return,
                        stack_types.iter().rev().copied(),
                    ));
                }
            }
        }
    }

    block.append(binder::invoke(binding));

    if function.returns_nullable() {
        match function.return_type() {
            RepType::BoxedPrim(_) => {
                let not_null = cx.fresh_label();
                block
                    .dup()
                    .jump_if_not_null(not_null)
                    .set_null_flag(cx, true)
                    .pop(function.return_type())
                    .push_default(unboxed_return)
                    .goto_label(end)
                    .mark(not_null)
                    .append(unbox_primitive(unboxed_return)?);
            }
            _ => {
                block
                    .dup()
                    .jump_if_not_null(end)
                    .set_null_flag(cx, true);
            }
        }
    }

    block.mark(end);
    Ok(block)
}
