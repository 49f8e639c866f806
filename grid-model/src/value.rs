//! FILENAME: grid-model/src/value.rs
//! PURPOSE: Typed cell values and JSON coercion.
//! CONTEXT: The data source hands us untyped JSON records. This module
//! converts raw JSON scalars into typed cell values, guided by the
//! column type from the schema. Coercion never fails: anything that
//! does not fit the declared type degrades to `Null` so a single bad
//! cell cannot halt rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnType;

/// A single typed cell value in the row model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// True for `Null` and for values that render as the null
    /// placeholder (NaN floats, empty strings).
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Coerces a raw JSON scalar into a cell value of the declared
    /// column type. Mismatched or unrepresentable input yields `Null`.
    pub fn from_json(raw: &Value, ty: ColumnType) -> Self {
        match (ty, raw) {
            (_, Value::Null) => CellValue::Null,
            (ColumnType::Integer, Value::Number(n)) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                // Sources may report integer columns but emit floats.
                None => n
                    .as_f64()
                    .map(|f| CellValue::Int(f as i64))
                    .unwrap_or(CellValue::Null),
            },
            (ColumnType::Float, Value::Number(n)) => n
                .as_f64()
                .map(CellValue::Float)
                .unwrap_or(CellValue::Null),
            (ColumnType::Date, Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Null),
            (ColumnType::Boolean, Value::Bool(b)) => CellValue::Bool(*b),
            (ColumnType::String, Value::String(s)) => CellValue::Text(s.clone()),
            // A string column receiving a non-string scalar still has a
            // sensible display form.
            (ColumnType::String, Value::Number(n)) => CellValue::Text(n.to_string()),
            (ColumnType::String, Value::Bool(b)) => CellValue::Text(b.to_string()),
            _ => CellValue::Null,
        }
    }

    /// Display label for tree-path segments. Unlike data cells this is
    /// lossy on purpose: any scalar becomes a string.
    pub fn label_from_json(raw: &Value) -> String {
        match raw {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
