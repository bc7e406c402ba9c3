//! Type handlers and the type registry
//!
//! A type handler is a pure parse/stringify pair. Options are passed in
//! explicitly on every call; handlers hold no per-session state.
//!
//! ## Built-in types
//!
//! `Int`, `Float`, `String`, `Date`, `Boolean`, `Array`, `IntArray` and
//! `FloatArray` ship pre-registered in [`TypeRegistry::with_builtins`].

pub mod builtins;
pub mod date;
pub mod number;
pub mod registry;

pub use registry::{TypeDef, TypeRegistry};

use crate::options::TypeOptions;
use crate::value::Value;

pub const INT: &str = "Int";
pub const FLOAT: &str = "Float";
pub const STRING: &str = "String";
pub const DATE: &str = "Date";
pub const BOOLEAN: &str = "Boolean";
pub const ARRAY: &str = "Array";
pub const INT_ARRAY: &str = "IntArray";
pub const FLOAT_ARRAY: &str = "FloatArray";

/// Is a raw query value absent (missing key or empty string)?
pub fn is_null(raw: Option<&str>) -> bool {
    matches!(raw, None | Some(""))
}

/// Is a typed value undefined?
pub fn is_undef(value: &Value) -> bool {
    value.is_null()
}

/// Parse/stringify pair registered under a type name
pub trait TypeHandler: Send + Sync {
    /// Produce a typed value from a raw query value.
    ///
    /// Must be total: return `fallback` (cloned) when `raw` is absent or
    /// cannot be parsed.
    fn parse(&self, raw: Option<&str>, fallback: &Value, options: &TypeOptions) -> Value;

    /// Produce the raw query text for a value, or `None` to omit the field.
    fn stringify(&self, value: &Value, options: &TypeOptions) -> Option<String>;
}

/// Adapter turning two closures into a [`TypeHandler`]
pub struct FnHandler<P, S> {
    parse: P,
    stringify: S,
}

impl<P, S> FnHandler<P, S>
where
    P: Fn(Option<&str>, &Value, &TypeOptions) -> Value + Send + Sync,
    S: Fn(&Value, &TypeOptions) -> Option<String> + Send + Sync,
{
    pub fn new(parse: P, stringify: S) -> Self {
        Self { parse, stringify }
    }
}

impl<P, S> TypeHandler for FnHandler<P, S>
where
    P: Fn(Option<&str>, &Value, &TypeOptions) -> Value + Send + Sync,
    S: Fn(&Value, &TypeOptions) -> Option<String> + Send + Sync,
{
    fn parse(&self, raw: Option<&str>, fallback: &Value, options: &TypeOptions) -> Value {
        (self.parse)(raw, fallback, options)
    }

    fn stringify(&self, value: &Value, options: &TypeOptions) -> Option<String> {
        (self.stringify)(value, options)
    }
}
