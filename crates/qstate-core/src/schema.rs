//! YAML schema configuration
//!
//! Describes groups, their typed fields with defaults, and option overrides
//! without writing Rust:
//!
//! ```yaml
//! options:
//!   Array: { separator: "|" }
//! push_policy: notify
//! groups:
//!   - name: pager
//!     fields:
//!       page: { type: Int, default: 1 }
//!       size: { type: Int, default: 20 }
//!   - name: filter
//!     fields:
//!       tags: { type: Array, default: [] }
//! ```
//!
//! Groups built from a schema have silent callbacks; attach real ones with
//! [`SchemaConfig::to_groups_with`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{QStateError, Result};
use crate::group::{ChangeCallback, Group, GroupSet};
use crate::options::Options;
use crate::session::{PushPolicy, SessionConfig};
use crate::types::TypeRegistry;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub default: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSchema {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub push_policy: PushPolicy,
    #[serde(default)]
    pub groups: Vec<GroupSchema>,
}

impl SchemaConfig {
    /// # Errors
    ///
    /// `Serialization` for malformed YAML, `InvalidSchema` when the
    /// document parses but fails validation.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: SchemaConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as
    /// [`SchemaConfig::from_yaml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| QStateError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        tracing::debug!(path = %path.display(), "schema loaded");
        Self::from_yaml_str(&text)
    }

    /// Structural checks: at least one group and no blank names
    ///
    /// # Errors
    ///
    /// `InvalidSchema` naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(invalid("schema declares no groups"));
        }
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(invalid("group name cannot be empty"));
            }
            for (field, spec) in &group.fields {
                if field.trim().is_empty() {
                    return Err(invalid(format!("group '{}' has an empty field name", group.name)));
                }
                if spec.type_name.trim().is_empty() {
                    return Err(invalid(format!("field '{}' has no type", field)));
                }
            }
        }
        Ok(())
    }

    /// Groups with silent callbacks
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when a default does not fit its field's type.
    pub fn to_groups(&self) -> Result<Vec<Group>> {
        self.to_groups_with(|_| -> ChangeCallback { Arc::new(|| {}) })
    }

    /// Groups whose callbacks come from `callback_for(group_name)`
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when a default does not fit its field's type.
    pub fn to_groups_with<F>(&self, mut callback_for: F) -> Result<Vec<Group>>
    where
        F: FnMut(&str) -> ChangeCallback,
    {
        self.groups
            .iter()
            .map(|schema| {
                let mut group = Group::with_callback(schema.name.clone(), callback_for(&schema.name));
                for (field, spec) in &schema.fields {
                    let default = Value::from_json(&spec.type_name, &spec.default)
                        .map_err(|e| invalid(format!("field '{}': {}", field, e)))?;
                    group = group.field(field.clone(), spec.type_name.clone(), default);
                }
                Ok(group)
            })
            .collect()
    }

    /// Validated group set with silent callbacks
    ///
    /// # Errors
    ///
    /// `InvalidSchema` for bad defaults, `DuplicateFieldName` and
    /// `UnknownType` as at session init.
    pub fn group_set(&self, registry: &TypeRegistry) -> Result<GroupSet> {
        let set = GroupSet::new(self.to_groups()?)?;
        set.validate_types(registry)?;
        Ok(set)
    }

    /// Session configuration carrying this schema's overrides and policy
    pub fn session_config(&self, registry: TypeRegistry) -> SessionConfig {
        SessionConfig::new()
            .with_registry(registry)
            .with_options(self.options.clone())
            .with_push_policy(self.push_policy)
    }
}

fn invalid(reason: impl Into<String>) -> QStateError {
    QStateError::InvalidSchema {
        reason: reason.into(),
    }
}
