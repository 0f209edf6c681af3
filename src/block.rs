//! Instruction sequence builder.
//!
//! Generators compose `Block`s: ordered trees of instructions, nested blocks
//! and structured conditionals. A finished block is lowered to a flat
//! instruction vector with `flatten`, which allocates the labels structured
//! conditionals need.

use crate::context::{EvalContext, Label, Slot};
use crate::types::RepType;
use crate::vm::Instruction;

#[derive(Clone, Debug)]
pub(crate) enum Node {
    Instr(Instruction),
    Block(Block),
    If(IfStatement),
}

/// Ordered sequence of generated code under construction.
#[derive(Clone, Debug, Default)]
pub struct Block {
    nodes: Vec<Node>,
}

impl Block {
    pub fn new() -> Block {
        Block::default()
    }

    pub fn instr(&mut self, instruction: Instruction) -> &mut Block {
        self.nodes.push(Node::Instr(instruction));
        self
    }

    pub fn append(&mut self, block: Block) -> &mut Block {
        self.nodes.push(Node::Block(block));
        self
    }

    pub fn append_if(&mut self, stmt: IfStatement) -> &mut Block {
        self.nodes.push(Node::If(stmt));
        self
    }

    pub fn push_long(&mut self, v: i64) -> &mut Block {
        self.instr(Instruction::PushLong(v))
    }

    pub fn push_double(&mut self, v: f64) -> &mut Block {
        self.instr(Instruction::PushDouble(v))
    }

    pub fn push_bool(&mut self, v: bool) -> &mut Block {
        self.instr(Instruction::PushBool(v))
    }

    pub fn push_null(&mut self) -> &mut Block {
        self.instr(Instruction::PushNull)
    }

    /// Push the representation default of `ty`; `Void` pushes nothing.
    pub fn push_default(&mut self, ty: RepType) -> &mut Block {
        match ty {
            RepType::Void => self,
            ty => self.instr(Instruction::PushDefault(ty)),
        }
    }

    /// Discard the top of stack occupied by a value of `ty`; `Void` occupies
    /// nothing and pops nothing.
    pub fn pop(&mut self, ty: RepType) -> &mut Block {
        match ty {
            RepType::Void => self,
            _ => self.instr(Instruction::Pop),
        }
    }

    pub fn dup(&mut self) -> &mut Block {
        self.instr(Instruction::Dup)
    }

    pub fn get_slot(&mut self, slot: Slot) -> &mut Block {
        self.instr(Instruction::LoadSlot(slot))
    }

    pub fn put_slot(&mut self, slot: Slot) -> &mut Block {
        self.instr(Instruction::StoreSlot(slot))
    }

    pub fn cast(&mut self, ty: RepType) -> &mut Block {
        self.instr(Instruction::Cast(ty))
    }

    pub fn get_null_flag(&mut self, cx: &EvalContext) -> &mut Block {
        self.get_slot(cx.null_flag())
    }

    pub fn set_null_flag(&mut self, cx: &EvalContext, value: bool) -> &mut Block {
        self.push_bool(value).put_slot(cx.null_flag())
    }

    pub fn goto_label(&mut self, label: Label) -> &mut Block {
        self.instr(Instruction::Jump(label))
    }

    pub fn jump_if_not_null(&mut self, label: Label) -> &mut Block {
        self.instr(Instruction::JumpIfNotNull(label))
    }

    pub fn mark(&mut self, label: Label) -> &mut Block {
        self.instr(Instruction::Mark(label))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| match node {
            Node::Instr(_) | Node::If(_) => false,
            Node::Block(block) => block.is_empty(),
        })
    }

    /// Lower to a flat instruction vector, allocating conditional labels from
    /// `cx`.
    pub fn flatten(self, cx: &EvalContext) -> Vec<Instruction> {
        let mut out = Vec::new();
        self.flatten_into(cx, &mut out);
        out
    }

    fn flatten_into(self, cx: &EvalContext, out: &mut Vec<Instruction>) {
        for node in self.nodes {
            match node {
                Node::Instr(instruction) => out.push(instruction),
                Node::Block(block) => block.flatten_into(cx, out),
                Node::If(stmt) => stmt.lower(cx, out),
            }
        }
    }
}

/// Structured conditional on a boolean left on the stack by `condition`.
///
/// Both branches must leave the stack in the same shape; the lowering emits a
/// single join point after the statement.
#[derive(Clone, Debug)]
pub struct IfStatement {
    condition: Block,
    if_true: Block,
    if_false: Block,
}

impl IfStatement {
    pub fn new(condition: Block) -> IfStatement {
        IfStatement {
            condition,
            if_true: Block::new(),
            if_false: Block::new(),
        }
    }

    pub fn if_true(mut self, block: Block) -> IfStatement {
        self.if_true = block;
        self
    }

    pub fn if_false(mut self, block: Block) -> IfStatement {
        self.if_false = block;
        self
    }

    fn lower(self, cx: &EvalContext, out: &mut Vec<Instruction>) {
        self.condition.flatten_into(cx, out);
        if self.if_false.is_empty() {
            let end = cx.fresh_label();
            out.push(Instruction::JumpIfFalse(end));
            self.if_true.flatten_into(cx, out);
            out.push(Instruction::Mark(end));
        } else {
            let false_label = cx.fresh_label();
            let end = cx.fresh_label();
            out.push(Instruction::JumpIfFalse(false_label));
            self.if_true.flatten_into(cx, out);
            out.push(Instruction::Jump(end));
            out.push(Instruction::Mark(false_label));
            self.if_false.flatten_into(cx, out);
            out.push(Instruction::Mark(end));
        }
    }
}
