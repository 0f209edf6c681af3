//! Execution model for generated code.

mod instruction_set;
mod vm;

pub use instruction_set::Instruction;
pub use vm::VM;

#[cfg(test)]
mod vm_test;
