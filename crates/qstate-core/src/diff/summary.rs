//! Plain-text rendering of a field diff.

use crate::diff::model::{ChangeKind, FieldChange};

/// One line per change: `+ name = new`, `- name (was old)`, `~ name: old -> new`
pub fn render_summary(changes: &[FieldChange]) -> String {
    if changes.is_empty() {
        return "no changes\n".to_string();
    }

    let mut out = String::new();
    for change in changes {
        let old = change.old.as_deref().unwrap_or_default();
        let new = change.new.as_deref().unwrap_or_default();
        let line = match change.kind {
            ChangeKind::Added => format!("+ {} = {}\n", change.name, new),
            ChangeKind::Removed => format!("- {} (was {})\n", change.name, old),
            ChangeKind::Modified => format!("~ {}: {} -> {}\n", change.name, old, new),
        };
        out.push_str(&line);
    }
    out
}
