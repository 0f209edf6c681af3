//! Call-site binding.
//!
//! Generated code never embeds callables or constants directly. Each call
//! site is an `Invoke` carrying a binding id; the binder records which
//! signature and bound value the id stands for, and linking produces the
//! `Linkage` the interpreter resolves ids against. Constants ride the same
//! mechanism as zero-argument sites.

use std::fmt;
use std::rc::Rc;

use ecow::EcoString;
use smallvec::SmallVec;

use crate::block::Block;
use crate::error::ExecutionError;
use crate::types::RepType;
use crate::values::Value;
use crate::vm::Instruction;

/// Identifier of one bound call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub(crate) u32);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site#{}", self.0)
    }
}

/// Shape of a call site: name, parameter representations, return
/// representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    name: EcoString,
    params: SmallVec<[RepType; 4]>,
    ret: RepType,
}

impl Signature {
    pub fn new(
        name: impl Into<EcoString>,
        params: impl IntoIterator<Item = RepType>,
        ret: RepType,
    ) -> Signature {
        Signature {
            name: name.into(),
            params: params.into_iter().collect(),
            ret,
        }
    }

    fn constant(id: u32, ty: RepType) -> Signature {
        Signature {
            name: EcoString::from(format!("constant_{id}")),
            params: SmallVec::new(),
            ret: ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[RepType] {
        &self.params
    }

    pub fn return_type(&self) -> RepType {
        self.ret
    }
}

/// What a call site resolves to at execution time.
#[derive(Clone)]
pub enum BoundValue {
    /// A pre-computed value pushed as-is.
    Constant(Value),
    /// A callable invoked with the site's popped arguments.
    Callable(Rc<CallableFn>),
}

pub type CallableFn = dyn Fn(&[Value]) -> Result<Value, ExecutionError>;

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            BoundValue::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// One recorded binding: the id generated code refers to plus its signature.
#[derive(Clone, Debug)]
pub struct Binding {
    id: BindingId,
    signature: Signature,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

/// Accumulates call-site bindings during generation of one sequence.
///
/// Ids are assigned in binding order, so identical generation inputs produce
/// identical ids.
#[derive(Debug, Default)]
pub struct CallSiteBinder {
    bindings: Vec<(Signature, BoundValue)>,
}

impl CallSiteBinder {
    pub fn new() -> CallSiteBinder {
        CallSiteBinder::default()
    }

    /// Record a callable under `signature` and return its binding.
    pub fn bind(&mut self, signature: Signature, bound: BoundValue) -> Binding {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push((signature.clone(), bound));
        Binding { id, signature }
    }

    /// Record a constant of representation `ty` and return its binding.
    pub fn bind_constant(&mut self, value: Value, ty: RepType) -> Binding {
        let id = self.bindings.len() as u32;
        let signature = Signature::constant(id, ty);
        self.bind(signature, BoundValue::Constant(value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Finish binding and produce the linkage execution resolves against.
    pub fn link(self) -> Linkage {
        tracing::debug!(sites = self.bindings.len(), "linked call sites");
        Linkage {
            bindings: self.bindings,
        }
    }
}

/// Resolved call-site table for one linked sequence.
#[derive(Debug)]
pub struct Linkage {
    bindings: Vec<(Signature, BoundValue)>,
}

impl Linkage {
    pub(crate) fn site(&self, id: BindingId) -> Option<&(Signature, BoundValue)> {
        self.bindings.get(id.0 as usize)
    }
}

/// Code pushing the constant behind `binding`.
pub fn load_constant(binding: &Binding) -> Block {
    let mut block = Block::new();
    block.instr(Instruction::Invoke(binding.id()));
    block
}

/// Code invoking the callable behind `binding` on the arguments currently on
/// the stack.
pub fn invoke(binding: &Binding) -> Block {
    let mut block = Block::new();
    block.instr(Instruction::Invoke(binding.id()));
    block
}
