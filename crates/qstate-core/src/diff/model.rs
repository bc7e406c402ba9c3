//! Diff output types.

use serde::{Deserialize, Serialize};

/// How a single field moved between two snapshots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One changed field with both raw values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldChange {
    pub name: String,
    pub kind: ChangeKind,
    pub old: Option<String>,
    pub new: Option<String>,
}

impl FieldChange {
    pub(crate) fn between(name: &str, old: Option<&str>, new: Option<&str>) -> Option<Self> {
        let kind = match (old, new) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            (Some(a), Some(b)) if a != b => ChangeKind::Modified,
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            kind,
            old: old.map(str::to_string),
            new: new.map(str::to_string),
        })
    }
}
