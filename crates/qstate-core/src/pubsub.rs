//! Topic-keyed publish/subscribe channel
//!
//! The navigation layer publishes on [`TOPIC_PUSH_STATE`] after every
//! programmatic push; sessions subscribe to it to pick up the new query.
//!
//! Handlers run on the publishing thread with no lock held, so a handler
//! may subscribe, unsubscribe or publish again.
//!
//! [`TOPIC_PUSH_STATE`]: qstate_core_types::schema::TOPIC_PUSH_STATE

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qstate_core_types::SubscriptionId;

/// Handler invoked with no arguments when its topic is published
pub type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: Handler,
}

/// Publish/subscribe channel shared by navigation and sessions
pub struct PubSub {
    topics: Mutex<BTreeMap<String, Vec<HandlerEntry>>>,
    next_id: AtomicU64,
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new()
    }
}

impl PubSub {
    pub fn new() -> Self {
        Self {
            topics: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn topics(&self) -> MutexGuard<'_, BTreeMap<String, Vec<HandlerEntry>>> {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a handler for `topic`
    ///
    /// Returns a `SubscriptionId` that can be used to unsubscribe.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = HandlerEntry {
            id,
            handler: Arc::new(handler),
        };
        self.topics().entry(topic.to_string()).or_default().push(entry);
        id
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) -> bool {
        let mut topics = self.topics();
        let Some(entries) = topics.get_mut(topic) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            topics.remove(topic);
        }
        removed
    }

    /// Invoke every handler of `topic` in subscription order
    ///
    /// Handlers added during delivery wait for the next publish. Returns
    /// how many handlers ran.
    pub fn publish(&self, topic: &str) -> usize {
        let entries: Vec<HandlerEntry> = self.topics().get(topic).cloned().unwrap_or_default();
        for entry in &entries {
            (entry.handler)();
        }
        entries.len()
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics().get(topic).map_or(0, Vec::len)
    }
}

impl fmt::Debug for PubSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<String, usize> = self
            .topics()
            .iter()
            .map(|(topic, entries)| (topic.clone(), entries.len()))
            .collect();
        f.debug_struct("PubSub").field("topics", &counts).finish()
    }
}
