use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::binder::CallSiteBinder;
use crate::block::Block;
use crate::codegen::{if_null_clear_pop_and_goto, if_null_pop_and_goto};
use crate::context::EvalContext;
use crate::types::{PrimKind, RepType};
use crate::values::{Session, Value};
use crate::vm::VM;

const LONG: RepType = RepType::Prim(PrimKind::Long);

fn run(cx: &EvalContext, block: Block) -> (Vec<Value>, bool) {
    let code = block.flatten(cx);
    let linkage = CallSiteBinder::new().link();
    let mut vm = VM::new(&code, &linkage, cx.initial_frame(Rc::new(Session::default())));
    vm.run().unwrap();
    let flag = vm.slot(cx.null_flag()).unwrap().as_bool().unwrap();
    (vm.stack().to_vec(), flag)
}

#[test]
fn set_flag_discards_stack_and_jumps() {
    let cx = EvalContext::new();
    let end = cx.fresh_label();

    let mut block = Block::new();
    block
        .push_long(7)
        .push_long(8)
        .set_null_flag(&cx, true)
        .append(if_null_pop_and_goto(&cx, end, LONG, [LONG, LONG]))
        // Skipped when the branch is taken.
        .push_long(99)
        .mark(end);

    let (stack, flag) = run(&cx, block);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].as_long().unwrap(), 0);
    assert!(flag);
}

#[test]
fn clear_flag_leaves_stack_alone() {
    let cx = EvalContext::new();
    let end = cx.fresh_label();

    let mut block = Block::new();
    block
        .push_long(7)
        .push_long(8)
        .append(if_null_pop_and_goto(&cx, end, LONG, [LONG, LONG]))
        .mark(end);

    let (stack, flag) = run(&cx, block);
    assert_eq!(stack.len(), 2);
    assert_eq!(stack[0].as_long().unwrap(), 7);
    assert_eq!(stack[1].as_long().unwrap(), 8);
    assert!(!flag);
}

#[test]
fn clearing_variant_resets_flag_on_the_taken_path() {
    let cx = EvalContext::new();
    let end = cx.fresh_label();

    let mut block = Block::new();
    block
        .push_long(7)
        .set_null_flag(&cx, true)
        .append(if_null_clear_pop_and_goto(&cx, end, LONG, [LONG]))
        .push_long(99)
        .mark(end);

    let (stack, flag) = run(&cx, block);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].as_long().unwrap(), 0);
    assert!(!flag);
}

#[test]
fn clearing_variant_is_a_noop_store_when_flag_is_clear() {
    let cx = EvalContext::new();
    let end = cx.fresh_label();

    let mut block = Block::new();
    block
        .push_long(7)
        .append(if_null_clear_pop_and_goto(&cx, end, LONG, [LONG]))
        .mark(end);

    let (stack, flag) = run(&cx, block);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].as_long().unwrap(), 7);
    assert!(!flag);
}

#[test]
fn void_return_pushes_no_default() {
    let cx = EvalContext::new();
    let end = cx.fresh_label();

    let mut block = Block::new();
    block
        .push_long(7)
        .set_null_flag(&cx, true)
        .append(if_null_pop_and_goto(&cx, end, RepType::Void, [LONG]))
        .mark(end);

    let (stack, flag) = run(&cx, block);
    assert!(stack.is_empty());
    assert!(flag);
}
