//! Snapshot diff computation.

use std::collections::BTreeSet;

use crate::diff::model::FieldChange;
use crate::query::RawQuery;

/// Names of fields whose raw value differs between `old` and `new`
pub fn diff(old: &RawQuery, new: &RawQuery) -> BTreeSet<String> {
    let mut changed = BTreeSet::new();

    for (name, value) in new.iter() {
        if old.get(name) != Some(value) {
            changed.insert(name.to_string());
        }
    }
    for (name, value) in old.iter() {
        if new.get(name) != Some(value) {
            changed.insert(name.to_string());
        }
    }

    changed
}

/// Same fields as [`diff`], each with its change kind and both values.
/// Sorted by field name.
pub fn diff_detailed(old: &RawQuery, new: &RawQuery) -> Vec<FieldChange> {
    diff(old, new)
        .into_iter()
        .filter_map(|name| FieldChange::between(&name, old.get(&name), new.get(&name)))
        .collect()
}
