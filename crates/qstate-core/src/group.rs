//! Field declarations and change groups
//!
//! A [`Group`] is the unit of change notification: its callback fires once
//! whenever any of its fields' raw values change. A [`GroupSet`] is the
//! ordered list of groups passed to `init`, plus the [`FieldIndex`] that
//! maps every field name back to exactly one owning group.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{QStateError, Result};
use crate::types::TypeRegistry;
use crate::value::Value;

/// Callback invoked with no arguments when a group's fields change
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// One logical query parameter
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub type_name: String,
    pub default: Value,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default,
        }
    }
}

/// Named cluster of fields sharing one change callback
#[derive(Clone)]
pub struct Group {
    name: String,
    fields: Vec<FieldSpec>,
    on_change: ChangeCallback,
}

impl Group {
    pub fn new<F>(name: impl Into<String>, on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            fields: Vec::new(),
            on_change: Arc::new(on_change),
        }
    }

    /// Group sharing an existing callback
    pub fn with_callback(name: impl Into<String>, on_change: ChangeCallback) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            on_change,
        }
    }

    /// Group whose callback does nothing (tooling, CLI)
    pub fn silent(name: impl Into<String>) -> Self {
        Self::new(name, || {})
    }

    /// Declare a field. A second declaration of the same name inside one
    /// group replaces the first.
    pub fn field(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: impl Into<Value>,
    ) -> Self {
        self.push(FieldSpec::new(name, type_name, default.into()));
        self
    }

    pub fn push(&mut self, spec: FieldSpec) {
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn callback(&self) -> &ChangeCallback {
        &self.on_change
    }

    pub fn notify(&self) {
        (self.on_change)()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Where a field lives
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub group: usize,
    pub spec: FieldSpec,
}

/// Union of all fields across a group set
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    entries: BTreeMap<String, FieldEntry>,
}

impl FieldIndex {
    /// Build the index, rejecting names declared by more than one group
    ///
    /// # Errors
    ///
    /// `DuplicateFieldName` naming both groups.
    pub fn build(groups: &[Group]) -> Result<Self> {
        let mut entries: BTreeMap<String, FieldEntry> = BTreeMap::new();

        for (idx, group) in groups.iter().enumerate() {
            for spec in group.fields() {
                if let Some(existing) = entries.get(&spec.name) {
                    return Err(QStateError::DuplicateFieldName {
                        field: spec.name.clone(),
                        first_group: groups[existing.group].name().to_string(),
                        second_group: group.name().to_string(),
                    });
                }
                entries.insert(
                    spec.name.clone(),
                    FieldEntry {
                        group: idx,
                        spec: spec.clone(),
                    },
                );
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, field: &str) -> Option<&FieldEntry> {
        self.entries.get(field)
    }

    pub fn group_of(&self, field: &str) -> Option<usize> {
        self.entries.get(field).map(|e| e.group)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Ordered groups plus their field index
#[derive(Debug, Clone)]
pub struct GroupSet {
    groups: Vec<Group>,
    index: FieldIndex,
}

impl GroupSet {
    /// # Errors
    ///
    /// `DuplicateFieldName` if two groups declare the same field.
    pub fn new(groups: Vec<Group>) -> Result<Self> {
        let index = FieldIndex::build(&groups)?;
        Ok(Self { groups, index })
    }

    /// Check every field's type against a registry
    ///
    /// # Errors
    ///
    /// `UnknownType` for the first field whose type is not registered.
    pub fn validate_types(&self, registry: &TypeRegistry) -> Result<()> {
        for group in &self.groups {
            for spec in group.fields() {
                if !registry.contains(&spec.type_name) {
                    return Err(QStateError::UnknownType {
                        type_name: spec.type_name.clone(),
                        field: spec.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get(&self, idx: usize) -> Option<&Group> {
        self.groups.get(idx)
    }

    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
