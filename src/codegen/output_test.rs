use std::cell::RefCell;
use std::rc::Rc;

use ecow::EcoString;
use pretty_assertions::assert_eq;

use crate::binder::{self, CallSiteBinder};
use crate::block::Block;
use crate::codegen::generate_write;
use crate::context::EvalContext;
use crate::sink::{ColumnSink, SinkEntry};
use crate::types::{ColumnType, RepType};
use crate::values::{Session, Value};
use crate::vm::VM;

struct Writer {
    cx: EvalContext,
    binder: CallSiteBinder,
    block: Block,
    sink: Rc<RefCell<ColumnSink>>,
}

impl Writer {
    /// Start a write-sequence test: the generated block sees the sink on the
    /// stack below whatever the value setup pushes.
    fn new() -> Writer {
        let mut writer = Writer {
            cx: EvalContext::new(),
            binder: CallSiteBinder::new(),
            block: Block::new(),
            sink: Rc::new(RefCell::new(ColumnSink::new())),
        };
        let sink_binding = writer
            .binder
            .bind_constant(Value::sink(Rc::clone(&writer.sink)), RepType::Ref);
        writer.block.append(binder::load_constant(&sink_binding));
        writer
    }

    fn finish(mut self, target: ColumnType) -> Vec<SinkEntry> {
        let write = generate_write(&mut self.binder, &mut self.cx, target);
        self.block.append(write);

        let code = self.block.flatten(&self.cx);
        let linkage = self.binder.link();
        let mut vm = VM::new(
            &code,
            &linkage,
            self.cx.initial_frame(Rc::new(Session::default())),
        );
        vm.run().unwrap();
        assert!(vm.stack().is_empty());
        let entries = self.sink.borrow().entries().to_vec();
        // Exactly one column position per write sequence.
        assert_eq!(entries.len(), 1);
        entries
    }
}

#[test]
fn writes_the_value_when_the_flag_is_clear() {
    let mut w = Writer::new();
    w.block.push_long(42);
    assert_eq!(w.finish(ColumnType::BigInt), vec![SinkEntry::Long(42)]);

    let mut w = Writer::new();
    w.block.push_double(2.5);
    assert_eq!(w.finish(ColumnType::Double), vec![SinkEntry::Double(2.5)]);

    let mut w = Writer::new();
    w.block.push_bool(true);
    assert_eq!(w.finish(ColumnType::Boolean), vec![SinkEntry::Bool(true)]);
}

#[test]
fn writes_a_null_marker_when_the_flag_is_set() {
    let mut w = Writer::new();
    w.block.push_long(0);
    w.block.set_null_flag(&w.cx, true);
    assert_eq!(w.finish(ColumnType::BigInt), vec![SinkEntry::Null]);
}

#[test]
fn void_like_columns_always_append_null() {
    // No value on the stack at all for the void-like type.
    let w = Writer::new();
    assert_eq!(w.finish(ColumnType::Unknown), vec![SinkEntry::Null]);
}

#[test]
fn writes_reference_values_for_varchar() {
    let mut w = Writer::new();
    let value = w
        .binder
        .bind_constant(Value::str("melon"), RepType::Ref);
    w.block.append(binder::load_constant(&value));
    assert_eq!(
        w.finish(ColumnType::Varchar),
        vec![SinkEntry::Str(EcoString::from("melon"))]
    );
}

#[test]
fn null_varchar_appends_a_marker_not_a_value() {
    let mut w = Writer::new();
    w.block.push_null();
    w.block.set_null_flag(&w.cx, true);
    assert_eq!(w.finish(ColumnType::Varchar), vec![SinkEntry::Null]);
}
