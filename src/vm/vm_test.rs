use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::binder::{BoundValue, CallSiteBinder, Signature};
use crate::block::{Block, IfStatement};
use crate::context::EvalContext;
use crate::error::ExecutionError;
use crate::types::{PrimKind, RepType};
use crate::values::{Obj, Session, Value};
use crate::vm::{Instruction, VM};

fn run(cx: &EvalContext, binder: CallSiteBinder, block: Block) -> (Vec<Value>, Vec<Value>) {
    let code = block.flatten(cx);
    let linkage = binder.link();
    let mut vm = VM::new(&code, &linkage, cx.initial_frame(Rc::new(Session::default())));
    vm.run().unwrap();
    (vm.stack().to_vec(), vm.slots().to_vec())
}

#[test]
fn if_statement_without_false_branch_lowers_to_one_label() {
    let cx = EvalContext::new();
    let mut condition = Block::new();
    condition.push_bool(true);
    let mut if_true = Block::new();
    if_true.push_long(1);

    let mut block = Block::new();
    block.append_if(IfStatement::new(condition).if_true(if_true));

    let end = crate::context::Label(0);
    assert_eq!(
        block.flatten(&cx),
        vec![
            Instruction::PushBool(true),
            Instruction::JumpIfFalse(end),
            Instruction::PushLong(1),
            Instruction::Mark(end),
        ]
    );
}

#[test]
fn if_statement_with_both_branches_lowers_to_two_labels() {
    let cx = EvalContext::new();
    let mut condition = Block::new();
    condition.push_bool(false);
    let mut if_true = Block::new();
    if_true.push_long(1);
    let mut if_false = Block::new();
    if_false.push_long(2);

    let mut block = Block::new();
    block.append_if(
        IfStatement::new(condition)
            .if_true(if_true)
            .if_false(if_false),
    );

    let false_label = crate::context::Label(0);
    let end = crate::context::Label(1);
    assert_eq!(
        block.flatten(&cx),
        vec![
            Instruction::PushBool(false),
            Instruction::JumpIfFalse(false_label),
            Instruction::PushLong(1),
            Instruction::Jump(end),
            Instruction::Mark(false_label),
            Instruction::PushLong(2),
            Instruction::Mark(end),
        ]
    );
}

#[test]
fn if_statement_takes_the_branch_the_condition_selects() {
    let cx = EvalContext::new();

    for (cond, expected) in [(true, 1), (false, 2)] {
        let mut condition = Block::new();
        condition.push_bool(cond);
        let mut if_true = Block::new();
        if_true.push_long(1);
        let mut if_false = Block::new();
        if_false.push_long(2);

        let mut block = Block::new();
        block.append_if(
            IfStatement::new(condition)
                .if_true(if_true)
                .if_false(if_false),
        );

        let (stack, _) = run(&cx, CallSiteBinder::new(), block);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].as_long().unwrap(), expected);
    }
}

#[test]
fn slots_store_and_reload() {
    let mut cx = EvalContext::new();
    let temp = cx.create_temp(RepType::Prim(PrimKind::Long));

    let mut block = Block::new();
    block.push_long(99).put_slot(temp).get_slot(temp);

    let (stack, slots) = run(&cx, CallSiteBinder::new(), block);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].as_long().unwrap(), 99);
    assert_eq!(slots[temp.index()].as_long().unwrap(), 99);
}

#[test]
fn initial_frame_holds_session_and_clear_flag() {
    let cx = EvalContext::new();
    let frame = cx.initial_frame(Rc::new(Session::default()));
    assert_eq!(frame.len(), cx.num_slots());
    assert_eq!(frame.len(), 2);
    assert!(matches!(frame[0], Value::Obj(Obj::Session(_))));
    assert!(!frame[1].as_bool().unwrap());
}

#[test]
fn initial_frame_defaults_temporaries() {
    let mut cx = EvalContext::new();
    let long_temp = cx.create_temp(RepType::Prim(PrimKind::Long));
    let ref_temp = cx.create_temp(RepType::Ref);

    let frame = cx.initial_frame(Rc::new(Session::default()));
    assert_eq!(frame.len(), cx.num_slots());
    assert_eq!(frame[long_temp.index()].as_long().unwrap(), 0);
    assert!(frame[ref_temp.index()].is_null_ref());
}

#[test]
fn callable_faults_propagate_out_of_invoke() {
    let cx = EvalContext::new();
    let mut binder = CallSiteBinder::new();
    let binding = binder.bind(
        Signature::new(
            "checked_sqrt",
            [RepType::Prim(PrimKind::Long)],
            RepType::Prim(PrimKind::Long),
        ),
        BoundValue::Callable(Rc::new(|args| {
            Err(ExecutionError::Fault(format!(
                "negative operand {}",
                args[0].as_long()?
            )))
        })),
    );

    let mut block = Block::new();
    block.push_long(-9).instr(Instruction::Invoke(binding.id()));

    let code = block.flatten(&cx);
    let linkage = binder.link();
    let mut vm = VM::new(&code, &linkage, cx.initial_frame(Rc::new(Session::default())));
    assert_eq!(
        vm.run(),
        Err(ExecutionError::Fault("negative operand -9".into()))
    );
}

#[test]
fn jump_to_unbound_label_faults() {
    let cx = EvalContext::new();
    let mut block = Block::new();
    block.goto_label(cx.fresh_label());

    let code = block.flatten(&cx);
    let linkage = CallSiteBinder::new().link();
    let mut vm = VM::new(&code, &linkage, cx.initial_frame(Rc::new(Session::default())));
    assert!(matches!(
        vm.run(),
        Err(ExecutionError::UnboundLabel(_))
    ));
}

#[test]
fn unresolved_call_site_faults() {
    let cx = EvalContext::new();
    // Binding recorded against a different binder than the one linked.
    let mut other = CallSiteBinder::new();
    let binding = other.bind(
        Signature::new("orphan", [], RepType::Prim(PrimKind::Long)),
        BoundValue::Constant(Value::Long(0)),
    );

    let mut block = Block::new();
    block.instr(Instruction::Invoke(binding.id()));

    let code = block.flatten(&cx);
    let linkage = CallSiteBinder::new().link();
    let mut vm = VM::new(&code, &linkage, cx.initial_frame(Rc::new(Session::default())));
    assert_eq!(
        vm.run(),
        Err(ExecutionError::UnresolvedCallSite(binding.id()))
    );
}

#[test]
fn constant_sites_push_their_value() {
    let cx = EvalContext::new();
    let mut binder = CallSiteBinder::new();
    let binding = binder.bind_constant(Value::Long(17), RepType::Prim(PrimKind::Long));

    let mut block = Block::new();
    block.append(crate::binder::load_constant(&binding));

    let (stack, _) = run(&cx, binder, block);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].as_long().unwrap(), 17);
}

#[test]
fn pop_on_empty_stack_underflows() {
    let cx = EvalContext::new();
    let mut block = Block::new();
    block.instr(Instruction::Pop);

    let code = block.flatten(&cx);
    let linkage = CallSiteBinder::new().link();
    let mut vm = VM::new(&code, &linkage, cx.initial_frame(Rc::new(Session::default())));
    assert_eq!(vm.run(), Err(ExecutionError::StackUnderflow));
}
