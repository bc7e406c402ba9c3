//! Type registry
//!
//! Maps type names to handlers plus their default options. Registration is
//! last-write-wins by name. The registry is a plain value: a session takes
//! its own snapshot at `init`, so extending one registry never affects a
//! session built from another.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::builtins::{BooleanType, DateType, Element, FloatType, IntType, ListType, StringType};
use super::{TypeHandler, ARRAY, BOOLEAN, DATE, FLOAT, FLOAT_ARRAY, INT, INT_ARRAY, STRING};
use crate::errors::{QStateError, Result};
use crate::options::{Options, TypeOptions, DEFAULT_DATE_FORMAT, DEFAULT_RADIX, DEFAULT_SEPARATOR};

/// A handler together with its default options
#[derive(Clone)]
pub struct TypeDef {
    handler: Arc<dyn TypeHandler>,
    defaults: TypeOptions,
}

impl TypeDef {
    pub fn new(handler: impl TypeHandler + 'static, defaults: TypeOptions) -> Self {
        Self {
            handler: Arc::new(handler),
            defaults,
        }
    }

    pub fn from_arc(handler: Arc<dyn TypeHandler>, defaults: TypeOptions) -> Self {
        Self { handler, defaults }
    }

    pub fn handler(&self) -> &Arc<dyn TypeHandler> {
        &self.handler
    }

    pub fn defaults(&self) -> &TypeOptions {
        &self.defaults
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Named type handlers with per-type default options
#[derive(Clone, Default, Debug)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDef>,
}

impl TypeRegistry {
    /// Registry with no types at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the eight built-in types
    pub fn with_builtins() -> Self {
        let list_opts = || TypeOptions::new().with_separator(DEFAULT_SEPARATOR);
        let mut types = BTreeMap::new();

        let builtins = [
            (INT, TypeDef::new(IntType, TypeOptions::new().with_radix(DEFAULT_RADIX))),
            (FLOAT, TypeDef::new(FloatType, TypeOptions::new())),
            (STRING, TypeDef::new(StringType, TypeOptions::new())),
            (BOOLEAN, TypeDef::new(BooleanType, TypeOptions::new())),
            (
                DATE,
                TypeDef::new(DateType, TypeOptions::new().with_format(DEFAULT_DATE_FORMAT)),
            ),
            (ARRAY, TypeDef::new(ListType::new(Element::Text), list_opts())),
            (
                INT_ARRAY,
                TypeDef::new(
                    ListType::new(Element::Int),
                    list_opts().with_radix(DEFAULT_RADIX),
                ),
            ),
            (FLOAT_ARRAY, TypeDef::new(ListType::new(Element::Float), list_opts())),
        ];
        for (name, def) in builtins {
            types.insert(name.to_string(), def);
        }

        Self { types }
    }

    /// Add or replace a type
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `name` is empty or whitespace.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl TypeHandler + 'static,
        defaults: TypeOptions,
    ) -> Result<()> {
        self.insert(name.into(), TypeDef::new(handler, defaults))
    }

    /// Add or replace several types at once
    ///
    /// Either every entry is registered or, on error, none is.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when any name is empty or whitespace.
    pub fn extend<I, K>(&mut self, types: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, TypeDef)>,
        K: Into<String>,
    {
        let staged: Vec<(String, TypeDef)> =
            types.into_iter().map(|(k, def)| (k.into(), def)).collect();
        for (name, _) in &staged {
            validate_name(name)?;
        }
        for (name, def) in staged {
            self.insert(name, def)?;
        }
        Ok(())
    }

    fn insert(&mut self, name: String, def: TypeDef) -> Result<()> {
        validate_name(&name)?;
        if self.types.insert(name.clone(), def).is_some() {
            tracing::debug!(type_name = %name, "type handler replaced");
        }
        Ok(())
    }

    /// Look up a handler by name
    ///
    /// # Errors
    ///
    /// `UnknownType` when nothing is registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn TypeHandler>> {
        self.types
            .get(name)
            .map(TypeDef::handler)
            .ok_or_else(|| QStateError::UnknownType {
                type_name: name.to_string(),
                field: String::new(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Default options of every registered type
    pub fn default_options(&self) -> Options {
        self.types
            .iter()
            .map(|(name, def)| (name.clone(), def.defaults.clone()))
            .collect()
    }

    /// Registry defaults overlaid with caller overrides
    pub fn merged_options(&self, overrides: &Options) -> Options {
        self.default_options().merged_with(overrides)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(QStateError::InvalidInput {
            reason: "type name cannot be empty".to_string(),
        });
    }
    Ok(())
}
