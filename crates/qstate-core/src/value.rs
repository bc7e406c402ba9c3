//! Typed field values
//!
//! [`Value`] is what a type handler's `parse` produces and its `stringify`
//! consumes. Extension types that need a shape not covered by the built-in
//! variants carry it as [`Value::Json`].

use chrono::NaiveDateTime;
use serde_json::json;
use std::fmt;

use crate::errors::{QStateError, Result};
use crate::types::{ARRAY, BOOLEAN, DATE, FLOAT, FLOAT_ARRAY, INT, INT_ARRAY, STRING};

/// Typed value of a single query field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Undefined; stringifies to nothing
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Date(NaiveDateTime),
    List(Vec<String>),
    /// `None` marks an element that did not parse
    IntList(Vec<Option<i64>>),
    /// Malformed elements are `NaN`
    FloatList(Vec<f64>),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Build a value for `type_name` from JSON, as found in schema files
    /// and CLI input.
    ///
    /// `null` always maps to [`Value::Null`]. Unregistered (extension) type
    /// names keep the JSON as-is.
    pub fn from_json(type_name: &str, json: &serde_json::Value) -> Result<Value> {
        use serde_json::Value as J;

        let mismatch = || QStateError::InvalidInput {
            reason: format!("{} is not a valid {} value", json, type_name),
        };

        if json.is_null() {
            return Ok(Value::Null);
        }

        let value = match type_name {
            INT => Value::Int(json.as_i64().ok_or_else(mismatch)?),
            FLOAT => Value::Float(json.as_f64().ok_or_else(mismatch)?),
            STRING => Value::Str(json.as_str().ok_or_else(mismatch)?.to_string()),
            BOOLEAN => Value::Bool(json.as_bool().ok_or_else(mismatch)?),
            DATE => {
                let text = json.as_str().ok_or_else(mismatch)?;
                Value::Date(crate::types::date::parse_date(text).ok_or_else(mismatch)?)
            }
            ARRAY => {
                let items = json.as_array().ok_or_else(mismatch)?;
                let list = items
                    .iter()
                    .map(|item| match item {
                        J::String(s) => Ok(s.clone()),
                        J::Number(n) => Ok(n.to_string()),
                        J::Bool(b) => Ok(b.to_string()),
                        _ => Err(mismatch()),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Value::List(list)
            }
            INT_ARRAY => {
                let items = json.as_array().ok_or_else(mismatch)?;
                Value::IntList(items.iter().map(J::as_i64).collect())
            }
            FLOAT_ARRAY => {
                let items = json.as_array().ok_or_else(mismatch)?;
                Value::FloatList(items.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect())
            }
            _ => Value::Json(json.clone()),
        };

        Ok(value)
    }

    /// JSON rendering used by the CLI and for debugging
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(n) => json!(n),
            Value::Float(n) if n.is_finite() => json!(n),
            Value::Float(n) => json!(format_number(*n)),
            Value::Str(s) => json!(s),
            Value::Bool(b) => json!(b),
            Value::Date(d) => json!(d.format("%Y-%m-%dT%H:%M:%S").to_string()),
            Value::List(items) => json!(items),
            Value::IntList(items) => json!(items),
            Value::FloatList(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|n| Value::Float(*n).to_json())
                    .collect(),
            ),
            Value::Json(v) => v.clone(),
        }
    }
}

/// Number text the way a browser prints it: `2`, `0.5`, `NaN`, `Infinity`
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Generic text form, used when a stringifier receives a variant it does
/// not natively handle
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S")),
            Value::List(items) => f.write_str(&items.join(",")),
            Value::IntList(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|n| n.map_or_else(|| "NaN".to_string(), |n| n.to_string()))
                    .collect();
                f.write_str(&parts.join(","))
            }
            Value::FloatList(items) => {
                let parts: Vec<String> = items.iter().map(|n| format_number(*n)).collect();
                f.write_str(&parts.join(","))
            }
            Value::Json(serde_json::Value::String(s)) => f.write_str(s),
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}
