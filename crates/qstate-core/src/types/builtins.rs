//! Built-in type handlers

use super::date::{format_date, parse_date};
use super::number::{parse_float_prefix, parse_int_prefix};
use super::{is_null, TypeHandler, DATE, FLOAT, INT};
use crate::log_fallback;
use crate::options::TypeOptions;
use crate::value::{format_number, Value};

/// Raw value, or `None` when it counts as absent
fn present(raw: Option<&str>) -> Option<&str> {
    if is_null(raw) {
        None
    } else {
        raw
    }
}

/// `Int`: radix-aware integer
pub struct IntType;

impl TypeHandler for IntType {
    fn parse(&self, raw: Option<&str>, fallback: &Value, options: &TypeOptions) -> Value {
        let Some(raw) = present(raw) else {
            return fallback.clone();
        };
        match parse_int_prefix(raw, options.radix()) {
            Some(n) => Value::Int(n),
            None => {
                log_fallback!(INT, raw);
                fallback.clone()
            }
        }
    }

    fn stringify(&self, value: &Value, _options: &TypeOptions) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Int(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// `Float`: decimal number
pub struct FloatType;

impl TypeHandler for FloatType {
    fn parse(&self, raw: Option<&str>, fallback: &Value, _options: &TypeOptions) -> Value {
        let Some(raw) = present(raw) else {
            return fallback.clone();
        };
        match parse_float_prefix(raw) {
            Some(n) => Value::Float(n),
            None => {
                log_fallback!(FLOAT, raw);
                fallback.clone()
            }
        }
    }

    fn stringify(&self, value: &Value, _options: &TypeOptions) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Float(n) => Some(format_number(*n)),
            other => Some(other.to_string()),
        }
    }
}

/// `String`: identity
pub struct StringType;

impl TypeHandler for StringType {
    fn parse(&self, raw: Option<&str>, fallback: &Value, _options: &TypeOptions) -> Value {
        present(raw).map_or_else(|| fallback.clone(), |s| Value::Str(s.to_string()))
    }

    fn stringify(&self, value: &Value, _options: &TypeOptions) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// `Boolean`: only the exact text `true` is true
pub struct BooleanType;

impl TypeHandler for BooleanType {
    fn parse(&self, raw: Option<&str>, fallback: &Value, _options: &TypeOptions) -> Value {
        present(raw).map_or_else(|| fallback.clone(), |s| Value::Bool(s == "true"))
    }

    fn stringify(&self, value: &Value, _options: &TypeOptions) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// `Date`: parsed leniently, written with the `format` mask
pub struct DateType;

impl TypeHandler for DateType {
    fn parse(&self, raw: Option<&str>, fallback: &Value, _options: &TypeOptions) -> Value {
        let Some(raw) = present(raw) else {
            return fallback.clone();
        };
        match parse_date(raw) {
            Some(d) => Value::Date(d),
            None => {
                log_fallback!(DATE, raw);
                fallback.clone()
            }
        }
    }

    fn stringify(&self, value: &Value, options: &TypeOptions) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Date(d) => Some(format_date(d, options.format())),
            other => Some(other.to_string()),
        }
    }
}

/// How list elements are read back from their raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Text,
    Int,
    Float,
}

/// `Array`, `IntArray` and `FloatArray`: separator-joined lists
///
/// Elements are parsed individually without fallback, so a malformed
/// entry stays in the list as `None`/`NaN`.
pub struct ListType {
    element: Element,
}

impl ListType {
    pub const fn new(element: Element) -> Self {
        Self { element }
    }
}

impl TypeHandler for ListType {
    fn parse(&self, raw: Option<&str>, fallback: &Value, options: &TypeOptions) -> Value {
        let Some(raw) = present(raw) else {
            return fallback.clone();
        };
        let parts = raw.split(options.separator());
        match self.element {
            Element::Text => Value::List(parts.map(str::to_string).collect()),
            Element::Int => Value::IntList(
                parts
                    .map(|item| parse_int_prefix(item, options.radix()))
                    .collect(),
            ),
            Element::Float => Value::FloatList(
                parts
                    .map(|item| parse_float_prefix(item).unwrap_or(f64::NAN))
                    .collect(),
            ),
        }
    }

    fn stringify(&self, value: &Value, options: &TypeOptions) -> Option<String> {
        let sep = options.separator();
        let parts: Vec<String> = match value {
            Value::Null => return None,
            Value::List(items) => items.clone(),
            Value::IntList(items) => items
                .iter()
                .map(|n| n.map_or_else(|| "NaN".to_string(), |n| n.to_string()))
                .collect(),
            Value::FloatList(items) => items.iter().map(|n| format_number(*n)).collect(),
            other => vec![other.to_string()],
        };
        if parts.is_empty() {
            return None;
        }
        Some(parts.join(sep))
    }
}
