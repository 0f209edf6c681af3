//! Columnar output sink.
//!
//! A sink collects the values of one output column position by position. The
//! generated write sequence appends exactly one entry per evaluation, either a
//! typed value or a null marker.

use ecow::EcoString;

use crate::error::ExecutionError;
use crate::types::ColumnType;
use crate::values::{Obj, Value};

/// One appended column position.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkEntry {
    Null,
    Long(i64),
    Double(f64),
    Bool(bool),
    Str(EcoString),
}

/// Append-only column buffer.
#[derive(Clone, Debug, Default)]
pub struct ColumnSink {
    entries: Vec<SinkEntry>,
}

impl ColumnSink {
    pub fn new() -> ColumnSink {
        ColumnSink::default()
    }

    pub fn append_long(&mut self, v: i64) {
        self.entries.push(SinkEntry::Long(v));
    }

    pub fn append_double(&mut self, v: f64) {
        self.entries.push(SinkEntry::Double(v));
    }

    pub fn append_bool(&mut self, v: bool) {
        self.entries.push(SinkEntry::Bool(v));
    }

    pub fn append_str(&mut self, v: EcoString) {
        self.entries.push(SinkEntry::Str(v));
    }

    pub fn append_null(&mut self) {
        self.entries.push(SinkEntry::Null);
    }

    /// Type-directed append used by the `Write` instruction.
    pub fn append(&mut self, ty: ColumnType, value: Value) -> Result<(), ExecutionError> {
        match ty {
            ColumnType::BigInt => self.append_long(value.as_long()?),
            ColumnType::Double => self.append_double(value.as_double()?),
            ColumnType::Boolean => self.append_bool(value.as_bool()?),
            ColumnType::Varchar => match value.into_obj()? {
                Obj::Str(s) => self.append_str(s),
                other => {
                    return Err(ExecutionError::RepConfusion {
                        expected: "string",
                        found: other.rep_name(),
                    });
                }
            },
            ColumnType::Unknown => self.append_null(),
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SinkEntry] {
        &self.entries
    }
}
