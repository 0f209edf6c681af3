//! Runtime values on the evaluation stack.

use std::cell::RefCell;
use std::rc::Rc;

use ecow::EcoString;

use crate::error::ExecutionError;
use crate::sink::ColumnSink;
use crate::types::{ColumnType, PrimKind, RepType};

/// One operand-stack slot.
#[derive(Clone, Debug)]
pub enum Value {
    Long(i64),
    Double(f64),
    Bool(bool),
    /// Reference-typed value; the only carrier of runtime NULL.
    Obj(Obj),
}

/// Reference values.
#[derive(Clone, Debug)]
pub enum Obj {
    /// The null reference; the boxed-null sentinel.
    Null,
    Long(i64),
    Double(f64),
    Bool(bool),
    Str(EcoString),
    Session(Rc<Session>),
    Sink(Rc<RefCell<ColumnSink>>),
    TypeMeta(ColumnType),
}

/// Opaque per-query execution context handed to context-taking callables.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub query_id: EcoString,
}

impl Value {
    pub fn null() -> Value {
        Value::Obj(Obj::Null)
    }

    pub fn str(s: impl Into<EcoString>) -> Value {
        Value::Obj(Obj::Str(s.into()))
    }

    pub fn session(session: Rc<Session>) -> Value {
        Value::Obj(Obj::Session(session))
    }

    pub fn sink(sink: Rc<RefCell<ColumnSink>>) -> Value {
        Value::Obj(Obj::Sink(sink))
    }

    pub fn type_meta(ty: ColumnType) -> Value {
        Value::Obj(Obj::TypeMeta(ty))
    }

    /// Representation default occupying a result slot when the true result is
    /// NULL. `Void` has no value at all.
    pub fn default_of(ty: RepType) -> Option<Value> {
        match ty {
            RepType::Prim(PrimKind::Long | PrimKind::Int) => Some(Value::Long(0)),
            RepType::Prim(PrimKind::Double | PrimKind::Float) => Some(Value::Double(0.0)),
            RepType::Prim(PrimKind::Bool) => Some(Value::Bool(false)),
            RepType::BoxedPrim(_) | RepType::Ref | RepType::Session => Some(Value::null()),
            RepType::Void => None,
        }
    }

    pub fn rep_name(&self) -> &'static str {
        match self {
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Obj(obj) => obj.rep_name(),
        }
    }

    pub fn as_long(&self) -> Result<i64, ExecutionError> {
        match self {
            Value::Long(v) => Ok(*v),
            other => Err(ExecutionError::RepConfusion {
                expected: "long",
                found: other.rep_name(),
            }),
        }
    }

    pub fn as_double(&self) -> Result<f64, ExecutionError> {
        match self {
            Value::Double(v) => Ok(*v),
            other => Err(ExecutionError::RepConfusion {
                expected: "double",
                found: other.rep_name(),
            }),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ExecutionError> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(ExecutionError::RepConfusion {
                expected: "bool",
                found: other.rep_name(),
            }),
        }
    }

    pub fn as_obj(&self) -> Result<&Obj, ExecutionError> {
        match self {
            Value::Obj(obj) => Ok(obj),
            other => Err(ExecutionError::RepConfusion {
                expected: "reference",
                found: other.rep_name(),
            }),
        }
    }

    pub fn into_obj(self) -> Result<Obj, ExecutionError> {
        match self {
            Value::Obj(obj) => Ok(obj),
            other => Err(ExecutionError::RepConfusion {
                expected: "reference",
                found: other.rep_name(),
            }),
        }
    }

    pub fn is_null_ref(&self) -> bool {
        matches!(self, Value::Obj(Obj::Null))
    }

    pub(crate) fn into_sink(self) -> Result<Rc<RefCell<ColumnSink>>, ExecutionError> {
        match self.into_obj()? {
            Obj::Sink(sink) => Ok(sink),
            other => Err(ExecutionError::RepConfusion {
                expected: "sink",
                found: other.rep_name(),
            }),
        }
    }

    pub(crate) fn into_type_meta(self) -> Result<ColumnType, ExecutionError> {
        match self.into_obj()? {
            Obj::TypeMeta(ty) => Ok(ty),
            other => Err(ExecutionError::RepConfusion {
                expected: "type metadata",
                found: other.rep_name(),
            }),
        }
    }

    /// Box a raw primitive of `kind` into its reference form.
    pub(crate) fn box_prim(self, kind: PrimKind) -> Result<Value, ExecutionError> {
        match kind {
            PrimKind::Long => Ok(Value::Obj(Obj::Long(self.as_long()?))),
            PrimKind::Double => Ok(Value::Obj(Obj::Double(self.as_double()?))),
            PrimKind::Bool => Ok(Value::Obj(Obj::Bool(self.as_bool()?))),
            PrimKind::Int | PrimKind::Float => Err(ExecutionError::RepConfusion {
                expected: "boxable primitive",
                found: kind.name(),
            }),
        }
    }

    /// Unwrap a boxed reference back to the raw primitive of `kind`.
    ///
    /// Generated code only reaches this on paths proven non-null, so a null
    /// reference here is a fault, not a NULL result.
    pub(crate) fn unbox_prim(self, kind: PrimKind) -> Result<Value, ExecutionError> {
        let obj = self.into_obj()?;
        match (obj, kind) {
            (Obj::Null, _) => Err(ExecutionError::NullUnbox),
            (Obj::Long(v), PrimKind::Long) => Ok(Value::Long(v)),
            (Obj::Double(v), PrimKind::Double) => Ok(Value::Double(v)),
            (Obj::Bool(v), PrimKind::Bool) => Ok(Value::Bool(v)),
            (obj, kind) => Err(ExecutionError::RepConfusion {
                expected: kind.name(),
                found: obj.rep_name(),
            }),
        }
    }

    /// Verify a checked reference cast without consuming the value.
    pub(crate) fn check_cast(&self, ty: RepType) -> Result<(), ExecutionError> {
        let obj = self.as_obj()?;
        if obj.matches(ty) {
            Ok(())
        } else {
            Err(ExecutionError::RepConfusion {
                expected: "castable reference",
                found: obj.rep_name(),
            })
        }
    }
}

impl Obj {
    pub fn is_null(&self) -> bool {
        matches!(self, Obj::Null)
    }

    pub fn rep_name(&self) -> &'static str {
        match self {
            Obj::Null => "null reference",
            Obj::Long(_) => "boxed long",
            Obj::Double(_) => "boxed double",
            Obj::Bool(_) => "boxed bool",
            Obj::Str(_) => "string",
            Obj::Session(_) => "session",
            Obj::Sink(_) => "sink",
            Obj::TypeMeta(_) => "type metadata",
        }
    }

    /// Reference-cast compatibility; the null reference passes any cast.
    fn matches(&self, ty: RepType) -> bool {
        match self {
            Obj::Null => ty.is_reference(),
            Obj::Long(_) => ty == RepType::BoxedPrim(PrimKind::Long),
            Obj::Double(_) => ty == RepType::BoxedPrim(PrimKind::Double),
            Obj::Bool(_) => ty == RepType::BoxedPrim(PrimKind::Bool),
            Obj::Str(_) | Obj::Sink(_) | Obj::TypeMeta(_) => ty == RepType::Ref,
            Obj::Session(_) => ty == RepType::Session,
        }
    }
}
