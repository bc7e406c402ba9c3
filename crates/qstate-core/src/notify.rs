//! Diff-driven change notification
//!
//! A [`Notifier`] keeps the current raw snapshot for a group set. Each
//! observation diffs the new snapshot against it, swaps it in, and then
//! fires the callback of every touched group exactly once, in group order.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::diff::diff;
use crate::group::{ChangeCallback, GroupSet};
use crate::query::RawQuery;

/// Outcome of one observation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    /// Fields whose raw value changed, including fields no group declares
    pub changed: BTreeSet<String>,
    /// Indexes of the groups whose callbacks ran
    pub fired: Vec<usize>,
}

impl Notification {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

pub struct Notifier {
    groups: Arc<GroupSet>,
    current: Mutex<RawQuery>,
}

impl Notifier {
    pub fn new(groups: Arc<GroupSet>, initial: RawQuery) -> Self {
        Self {
            groups,
            current: Mutex::new(initial),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RawQuery> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> RawQuery {
        self.lock().clone()
    }

    /// Replace the snapshot without notifying anyone
    pub fn set_current(&self, next: RawQuery) {
        *self.lock() = next;
    }

    /// Groups touched by a set of changed field names, in group order
    pub fn touched_groups(&self, changed: &BTreeSet<String>) -> Vec<usize> {
        let index = self.groups.index();
        changed
            .iter()
            .filter_map(|name| index.group_of(name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Process a new snapshot
    ///
    /// The snapshot becomes current before any callback runs, and no lock
    /// is held while they run, so a callback may read `current` or push a
    /// new state that is observed recursively.
    pub fn observe(&self, next: RawQuery) -> Notification {
        let changed = {
            let mut current = self.lock();
            let changed = diff(&current, &next);
            *current = next;
            changed
        };
        if changed.is_empty() {
            return Notification::default();
        }

        let fired = self.touched_groups(&changed);
        let callbacks: Vec<ChangeCallback> = fired
            .iter()
            .filter_map(|&idx| self.groups.get(idx))
            .map(|group| group.callback().clone())
            .collect();
        for callback in callbacks {
            callback();
        }

        Notification { changed, fired }
    }
}
