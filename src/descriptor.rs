//! Function descriptors: the callable-facing metadata the invocation
//! generator consumes.

use smallvec::SmallVec;

use crate::binder::Signature;
use crate::types::RepType;

/// One declared parameter of a scalar function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parameter {
    /// The implicit per-query context, supplied by the engine rather than by
    /// an argument sequence.
    Session,
    /// A value argument.
    Arg { ty: RepType, nullable: bool },
}

impl Parameter {
    pub fn rep(self) -> RepType {
        match self {
            Parameter::Session => RepType::Session,
            Parameter::Arg { ty, .. } => ty,
        }
    }
}

/// Descriptor of a scalar function as the invocation generator sees it.
///
/// Nullable parameters and a nullable return are declared with boxed
/// representation types; the generator relies on that pairing rather than
/// re-deriving it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescriptor {
    params: SmallVec<[Parameter; 4]>,
    return_type: RepType,
    nullable_return: bool,
}

impl FunctionDescriptor {
    pub fn new(
        params: impl IntoIterator<Item = Parameter>,
        return_type: RepType,
        nullable_return: bool,
    ) -> FunctionDescriptor {
        FunctionDescriptor {
            params: params.into_iter().collect(),
            return_type,
            nullable_return,
        }
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn return_type(&self) -> RepType {
        self.return_type
    }

    pub fn returns_nullable(&self) -> bool {
        self.nullable_return
    }

    /// Number of value arguments the caller must supply (context parameters
    /// excluded).
    pub fn arg_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !matches!(p, Parameter::Session))
            .count()
    }

    /// Call-site signature for binding this function under `name`.
    pub fn signature(&self, name: &str) -> Signature {
        Signature::new(name, self.params.iter().map(|p| p.rep()), self.return_type)
    }
}
