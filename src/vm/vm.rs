//! Reference interpreter for generated instruction sequences.
//!
//! This is the execution model the generators target: an operand stack, a
//! local-slot frame, symbolic labels resolved by a pre-scan, and call sites
//! resolved through a [`Linkage`]. It backs the test suite rather than a hot
//! path, so dispatch is plain safe indexing.

use hashbrown::HashMap;

use crate::binder::{BindingId, BoundValue, Linkage};
use crate::context::{Label, Slot};
use crate::error::ExecutionError;
use crate::types::RepType;
use crate::values::Value;
use crate::vm::Instruction;

pub struct VM<'a> {
    code: &'a [Instruction],
    linkage: &'a Linkage,
    stack: Vec<Value>,
    slots: Vec<Value>,
    targets: HashMap<Label, usize>,
}

impl<'a> VM<'a> {
    /// Set up execution of `code` over the given initial frame.
    pub fn new(code: &'a [Instruction], linkage: &'a Linkage, frame: Vec<Value>) -> VM<'a> {
        let mut targets = HashMap::new();
        for (pos, instruction) in code.iter().enumerate() {
            if let Instruction::Mark(label) = instruction {
                targets.insert(*label, pos);
            }
        }
        VM {
            code,
            linkage,
            stack: Vec::new(),
            slots: frame,
            targets,
        }
    }

    /// Execute to the end of the sequence.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        let mut ip = 0;
        while ip < self.code.len() {
            match self.code[ip] {
                Instruction::Mark(_) => {}
                Instruction::Jump(label) => {
                    ip = self.target(label)?;
                    continue;
                }
                Instruction::JumpIfFalse(label) => {
                    let cond = self.pop()?.as_bool()?;
                    if !cond {
                        ip = self.target(label)?;
                        continue;
                    }
                }
                Instruction::JumpIfNotNull(label) => {
                    let value = self.pop()?;
                    value.as_obj()?;
                    if !value.is_null_ref() {
                        ip = self.target(label)?;
                        continue;
                    }
                }
                Instruction::PushLong(v) => self.stack.push(Value::Long(v)),
                Instruction::PushDouble(v) => self.stack.push(Value::Double(v)),
                Instruction::PushBool(v) => self.stack.push(Value::Bool(v)),
                Instruction::PushNull => self.stack.push(Value::null()),
                Instruction::PushDefault(ty) => {
                    if let Some(value) = Value::default_of(ty) {
                        self.stack.push(value);
                    }
                }
                Instruction::Pop => {
                    self.pop()?;
                }
                Instruction::Dup => {
                    let top = self.stack.last().ok_or(ExecutionError::StackUnderflow)?;
                    self.stack.push(top.clone());
                }
                Instruction::LoadSlot(slot) => {
                    let value = self
                        .slots
                        .get(slot.index())
                        .ok_or(ExecutionError::UndefinedSlot(slot))?;
                    self.stack.push(value.clone());
                }
                Instruction::StoreSlot(slot) => {
                    let value = self.pop()?;
                    let dest = self
                        .slots
                        .get_mut(slot.index())
                        .ok_or(ExecutionError::UndefinedSlot(slot))?;
                    *dest = value;
                }
                Instruction::Cast(ty) => {
                    let top = self.stack.last().ok_or(ExecutionError::StackUnderflow)?;
                    top.check_cast(ty)?;
                }
                Instruction::BoxPrim(kind) => {
                    let value = self.pop()?;
                    self.stack.push(value.box_prim(kind)?);
                }
                Instruction::UnboxPrim(kind) => {
                    let value = self.pop()?;
                    self.stack.push(value.unbox_prim(kind)?);
                }
                Instruction::Invoke(id) => self.invoke(id)?,
                Instruction::Write => {
                    let value = self.pop()?;
                    let sink = self.pop()?.into_sink()?;
                    let ty = self.pop()?.into_type_meta()?;
                    sink.borrow_mut().append(ty, value)?;
                }
                Instruction::AppendNull => {
                    let sink = self.pop()?.into_sink()?;
                    sink.borrow_mut().append_null();
                }
            }
            ip += 1;
        }
        Ok(())
    }

    fn invoke(&mut self, id: BindingId) -> Result<(), ExecutionError> {
        let (signature, bound) = self
            .linkage
            .site(id)
            .ok_or(ExecutionError::UnresolvedCallSite(id))?;
        match bound {
            BoundValue::Constant(value) => {
                self.stack.push(value.clone());
                Ok(())
            }
            BoundValue::Callable(callable) => {
                let arity = signature.params().len();
                if self.stack.len() < arity {
                    return Err(ExecutionError::StackUnderflow);
                }
                let args = self.stack.split_off(self.stack.len() - arity);
                match callable(&args) {
                    Ok(result) => {
                        if signature.return_type() != RepType::Void {
                            self.stack.push(result);
                        }
                        Ok(())
                    }
                    Err(err) => {
                        tracing::debug!(site = %id, name = signature.name(), error = %err, "callable fault");
                        Err(err)
                    }
                }
            }
        }
    }

    fn target(&self, label: Label) -> Result<usize, ExecutionError> {
        self.targets
            .get(&label)
            .copied()
            .ok_or(ExecutionError::UnboundLabel(label))
    }

    fn pop(&mut self) -> Result<Value, ExecutionError> {
        self.stack.pop().ok_or(ExecutionError::StackUnderflow)
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn slot(&self, slot: Slot) -> Option<&Value> {
        self.slots.get(slot.index())
    }

    pub fn slots(&self) -> &[Value] {
        &self.slots
    }
}
