//! Per-type handler options
//!
//! Every registered type carries a default [`TypeOptions`] record. A session
//! merges caller overrides over those defaults once, at `init`, and hands
//! the merged record to the handler on every parse/stringify call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_RADIX: u32 = 10;
pub const DEFAULT_SEPARATOR: &str = ",";
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd";

/// Options record for one type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radix: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    /// Free-form keys for extension types
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TypeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radix(mut self, radix: u32) -> Self {
        self.radix = Some(radix);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Radix for integer parsing, 10 when unset
    pub fn radix(&self) -> u32 {
        self.radix.unwrap_or(DEFAULT_RADIX)
    }

    /// List separator, `,` when unset or empty
    pub fn separator(&self) -> &str {
        match self.separator.as_deref() {
            Some(sep) if !sep.is_empty() => sep,
            _ => DEFAULT_SEPARATOR,
        }
    }

    /// Date mask, `yyyy-mm-dd` when unset
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Field-by-field overlay: keys set in `overrides` win
    pub fn overlay(&self, overrides: &TypeOptions) -> TypeOptions {
        let mut extra = self.extra.clone();
        extra.extend(overrides.extra.clone());
        TypeOptions {
            radix: overrides.radix.or(self.radix),
            format: overrides.format.clone().or_else(|| self.format.clone()),
            separator: overrides.separator.clone().or_else(|| self.separator.clone()),
            extra,
        }
    }
}

/// Options for every type, keyed by type name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, TypeOptions>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Options::insert`]
    pub fn with(mut self, type_name: impl Into<String>, options: TypeOptions) -> Self {
        self.insert(type_name, options);
        self
    }

    pub fn insert(&mut self, type_name: impl Into<String>, options: TypeOptions) {
        self.0.insert(type_name.into(), options);
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeOptions> {
        self.0.get(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeOptions)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `overrides` onto `self` per type name
    pub fn merged_with(&self, overrides: &Options) -> Options {
        let mut merged = self.0.clone();
        for (name, opts) in &overrides.0 {
            let combined = match merged.get(name) {
                Some(base) => base.overlay(opts),
                None => opts.clone(),
            };
            merged.insert(name.clone(), combined);
        }
        Options(merged)
    }
}

impl FromIterator<(String, TypeOptions)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, TypeOptions)>>(iter: I) -> Self {
        Options(iter.into_iter().collect())
    }
}
