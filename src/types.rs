//! Representation tags for values flowing through generated code.
//!
//! Every slot in a function descriptor carries an explicit representation tag.
//! Raw primitives live unboxed on the operand stack and cannot denote NULL;
//! boxed primitives are reference-typed wrappers that can. Conversions between
//! the two forms exist only for the kinds the engine actually boxes.

/// Raw primitive kinds of the stack target.
///
/// Scalar columns are represented engine-wide as 64-bit values (`Long`,
/// `Double`) plus `Bool`. `Int` and `Float` are narrow intermediates that
/// appear in arithmetic lowering and have no boxed form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimKind {
    Long,
    Int,
    Double,
    Float,
    Bool,
}

impl PrimKind {
    pub fn name(self) -> &'static str {
        match self {
            PrimKind::Long => "long",
            PrimKind::Int => "int",
            PrimKind::Double => "double",
            PrimKind::Float => "float",
            PrimKind::Bool => "bool",
        }
    }
}

/// Representation type of one descriptor slot or stack operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RepType {
    /// Raw primitive; cannot denote NULL on its own.
    Prim(PrimKind),
    /// Boxed wrapper around a primitive; the null reference denotes NULL.
    BoxedPrim(PrimKind),
    /// Opaque reference (variable-length data, metadata objects).
    Ref,
    /// The implicit per-query execution context.
    Session,
    /// No value.
    Void,
}

impl RepType {
    /// Strip the boxed wrapper, if any.
    pub fn unboxed(self) -> RepType {
        match self {
            RepType::BoxedPrim(kind) => RepType::Prim(kind),
            other => other,
        }
    }

    /// True for boxed primitive wrappers.
    pub fn is_wrapper(self) -> bool {
        matches!(self, RepType::BoxedPrim(_))
    }

    /// True when values of this representation live on the stack as references.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            RepType::BoxedPrim(_) | RepType::Ref | RepType::Session
        )
    }
}

/// Semantic column types understood by the output writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Varchar,
    /// The void-like type; writes of it are always null markers.
    Unknown,
}

impl ColumnType {
    /// Stack representation of one value of this type.
    pub fn rep(self) -> RepType {
        match self {
            ColumnType::BigInt => RepType::Prim(PrimKind::Long),
            ColumnType::Double => RepType::Prim(PrimKind::Double),
            ColumnType::Boolean => RepType::Prim(PrimKind::Bool),
            ColumnType::Varchar => RepType::Ref,
            ColumnType::Unknown => RepType::Void,
        }
    }
}
