//! Query codec
//!
//! Turns a raw query snapshot into typed per-group records (`load`) and
//! typed records back into raw strings (`convert`).
//!
//! The codec owns a snapshot of its type registry together with the options
//! merged from it. [`QueryCodec::extend`] publishes a new snapshot; calls
//! already running keep the one they started with.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::errors::{QStateError, Result};
use crate::group::GroupSet;
use crate::options::{Options, TypeOptions};
use crate::query::RawQuery;
use crate::types::{TypeDef, TypeHandler, TypeRegistry};
use crate::value::Value;

/// Typed values of one group, by field name
pub type TypedRecord = BTreeMap<String, Value>;

/// Raw strings of one group (or of all groups when merged), by field name
pub type RawRecord = BTreeMap<String, String>;

/// Argument of [`QueryCodec::convert`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertInput {
    /// One record; always converted as merged
    Single(TypedRecord),
    Many(Vec<TypedRecord>),
}

impl From<TypedRecord> for ConvertInput {
    fn from(record: TypedRecord) -> Self {
        ConvertInput::Single(record)
    }
}

impl From<Vec<TypedRecord>> for ConvertInput {
    fn from(records: Vec<TypedRecord>) -> Self {
        ConvertInput::Many(records)
    }
}

struct CodecState {
    registry: TypeRegistry,
    options: Options,
}

impl CodecState {
    fn new(registry: TypeRegistry, overrides: &Options) -> Self {
        let options = registry.merged_options(overrides);
        Self { registry, options }
    }

    fn options_for(&self, type_name: &str) -> TypeOptions {
        self.options.get(type_name).cloned().unwrap_or_default()
    }
}

/// Typed codec bound to one group set
pub struct QueryCodec {
    groups: Arc<GroupSet>,
    overrides: Options,
    state: ArcSwap<CodecState>,
}

impl QueryCodec {
    /// # Errors
    ///
    /// `UnknownType` if any field names a type missing from `registry`.
    pub fn new(groups: Arc<GroupSet>, registry: TypeRegistry, overrides: Options) -> Result<Self> {
        groups.validate_types(&registry)?;
        let state = CodecState::new(registry, &overrides);
        Ok(Self {
            groups,
            overrides,
            state: ArcSwap::from_pointee(state),
        })
    }

    pub fn groups(&self) -> &Arc<GroupSet> {
        &self.groups
    }

    /// Options in effect: registry defaults overlaid with the overrides
    /// given at construction
    pub fn options(&self) -> Options {
        self.state.load().options.clone()
    }

    /// Snapshot of the registry in effect
    pub fn registry(&self) -> TypeRegistry {
        self.state.load().registry.clone()
    }

    /// One typed record per group, in group order
    ///
    /// # Errors
    ///
    /// `UnknownType` if a field's type has disappeared from the registry.
    pub fn load(&self, raw: &RawQuery) -> Result<Vec<TypedRecord>> {
        let state = self.state.load();

        self.groups
            .groups()
            .iter()
            .map(|group| {
                let mut record = TypedRecord::new();
                for spec in group.fields() {
                    let handler = resolve_for_field(&state.registry, &spec.type_name, &spec.name)?;
                    let options = state.options_for(&spec.type_name);
                    let _span = tracing::debug_span!(
                        "parse_field",
                        group = group.name(),
                        field = spec.name.as_str()
                    )
                    .entered();
                    let value = handler.parse(raw.get(&spec.name), &spec.default, &options);
                    record.insert(spec.name.clone(), value);
                }
                Ok(record)
            })
            .collect()
    }

    /// Raw strings for typed records
    ///
    /// Types are looked up through the field index, so records may be
    /// partial. Fields that stringify to nothing or to `""` are omitted.
    /// With `is_merged` (forced for [`ConvertInput::Single`]) all records
    /// fold into a single mapping.
    ///
    /// # Errors
    ///
    /// `UnknownField` for a name no group declares.
    pub fn convert(&self, input: impl Into<ConvertInput>, is_merged: bool) -> Result<Vec<RawRecord>> {
        let (records, is_merged) = match input.into() {
            ConvertInput::Single(record) => (vec![record], true),
            ConvertInput::Many(records) => (records, is_merged),
        };
        let state = self.state.load();

        let converted = records
            .iter()
            .map(|record| self.convert_record(&state, record))
            .collect::<Result<Vec<_>>>()?;

        if !is_merged {
            return Ok(converted);
        }
        let merged = converted.into_iter().fold(RawRecord::new(), |mut acc, record| {
            acc.extend(record);
            acc
        });
        Ok(vec![merged])
    }

    fn convert_record(&self, state: &CodecState, record: &TypedRecord) -> Result<RawRecord> {
        let mut out = RawRecord::new();

        for (name, value) in record {
            let entry = self
                .groups
                .index()
                .get(name)
                .ok_or_else(|| QStateError::UnknownField {
                    field: name.clone(),
                })?;
            let type_name = &entry.spec.type_name;
            let handler = resolve_for_field(&state.registry, type_name, name)?;

            let text = handler.stringify(value, &state.options_for(type_name));
            if let Some(text) = text.filter(|t| !t.is_empty()) {
                out.insert(name.clone(), text);
            }
        }

        Ok(out)
    }

    /// Register or replace types for this codec only
    ///
    /// Options are re-merged so new defaults apply, while overrides given
    /// at construction still win.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty type name; nothing is applied then.
    pub fn extend<I, K>(&self, types: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, TypeDef)>,
        K: Into<String>,
    {
        let mut registry = self.state.load().registry.clone();
        registry.extend(types)?;
        self.state
            .store(Arc::new(CodecState::new(registry, &self.overrides)));
        Ok(())
    }
}

fn resolve_for_field<'a>(
    registry: &'a TypeRegistry,
    type_name: &str,
    field: &str,
) -> Result<&'a Arc<dyn TypeHandler>> {
    registry.resolve(type_name).map_err(|_| QStateError::UnknownType {
        type_name: type_name.to_string(),
        field: field.to_string(),
    })
}
