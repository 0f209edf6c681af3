//! Stack-target code generation for scalar function invocation in the Petrel
//! query engine.
//!
//! The expression compiler hands this crate a [`FunctionDescriptor`], one
//! pre-compiled [`Block`] per argument and a call-site [`Binding`]; it gets
//! back a block implementing three-valued NULL propagation around the call.
//! NULL travels out of band: a boolean flag slot plus a representation
//! default on the operand stack, with the boxed null reference appearing only
//! at the callable boundary for parameters and returns declared nullable.
//!
//! The [`vm`] module is the reference interpreter the generated sequences
//! target; it resolves call sites through a [`Linkage`] produced by the
//! [`CallSiteBinder`].

pub mod binder;
pub mod block;
pub mod codegen;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod sink;
pub mod types;
pub mod values;
pub mod vm;

pub use binder::{Binding, BindingId, BoundValue, CallSiteBinder, Linkage, Signature};
pub use block::{Block, IfStatement};
pub use codegen::{generate_invocation, generate_write};
pub use context::{EvalContext, Label, Slot};
pub use descriptor::{FunctionDescriptor, Parameter};
pub use error::{CodegenError, ExecutionError};
pub use sink::{ColumnSink, SinkEntry};
pub use types::{ColumnType, PrimKind, RepType};
pub use values::{Obj, Session, Value};
