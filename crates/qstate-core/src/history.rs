//! Host collaborators
//!
//! A session reads the current query through [`QuerySource`], listens for
//! back/forward navigation through [`NavigationEvents`], and hears about
//! programmatic pushes on the shared [`PubSub`] channel. [`MemoryHistory`]
//! implements all three in-process, standing in for a browser's session
//! history in tests and tooling.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qstate_core_types::schema::TOPIC_PUSH_STATE;
use qstate_core_types::ListenerId;

use crate::pubsub::PubSub;
use crate::query::RawQuery;

/// Navigation listener, invoked with no arguments after the location moved
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Where the current raw query comes from
pub trait QuerySource: Send + Sync {
    fn snapshot(&self) -> RawQuery;
}

/// Back/forward navigation notifications
pub trait NavigationEvents: Send + Sync {
    fn add_popstate_listener(&self, listener: Listener) -> ListenerId;

    /// Returns whether the listener was attached.
    fn remove_popstate_listener(&self, id: ListenerId) -> bool;
}

/// Everything a session needs from its host
#[derive(Clone)]
pub struct Environment {
    pub source: Arc<dyn QuerySource>,
    pub events: Arc<dyn NavigationEvents>,
    pub channel: Arc<PubSub>,
}

impl Environment {
    pub fn new(
        source: Arc<dyn QuerySource>,
        events: Arc<dyn NavigationEvents>,
        channel: Arc<PubSub>,
    ) -> Self {
        Self {
            source,
            events,
            channel,
        }
    }

    /// Environment backed entirely by one in-memory history
    pub fn memory(history: &Arc<MemoryHistory>) -> Self {
        Self {
            source: history.clone(),
            events: history.clone(),
            channel: history.channel().clone(),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Entries {
    stack: Vec<String>,
    cursor: usize,
}

impl Entries {
    fn current(&self) -> &str {
        self.stack.get(self.cursor).map_or("", String::as_str)
    }
}

/// In-memory session history
///
/// Entries are search strings. `push_state` discards forward entries and
/// publishes on the `pushState` topic; `back`/`forward`/`go` move the
/// cursor and fire popstate listeners. `replace_state` does neither.
pub struct MemoryHistory {
    entries: Mutex<Entries>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    channel: Arc<PubSub>,
}

impl MemoryHistory {
    pub fn new(initial_search: &str, channel: Arc<PubSub>) -> Self {
        Self {
            entries: Mutex::new(Entries {
                stack: vec![normalize(initial_search)],
                cursor: 0,
            }),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            channel,
        }
    }

    /// History with its own private channel
    pub fn standalone(initial_search: &str) -> Self {
        Self::new(initial_search, Arc::new(PubSub::new()))
    }

    pub fn channel(&self) -> &Arc<PubSub> {
        &self.channel
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current search string, without the leading `?`
    pub fn location_search(&self) -> String {
        self.entries().current().to_string()
    }

    pub fn len(&self) -> usize {
        self.entries().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().stack.is_empty()
    }

    /// Append an entry and announce it on the `pushState` topic
    pub fn push_state(&self, search: &str) {
        {
            let mut entries = self.entries();
            let keep = entries.cursor + 1;
            entries.stack.truncate(keep);
            entries.stack.push(normalize(search));
            entries.cursor = keep;
        }
        tracing::debug!(search = search, "history push");
        self.channel.publish(TOPIC_PUSH_STATE);
    }

    /// [`push_state`](Self::push_state) with an encoded query
    pub fn push_query(&self, query: &RawQuery) {
        self.push_state(&query.to_query_string());
    }

    /// Overwrite the current entry silently
    pub fn replace_state(&self, search: &str) {
        let mut entries = self.entries();
        let cursor = entries.cursor;
        if let Some(slot) = entries.stack.get_mut(cursor) {
            *slot = normalize(search);
        }
    }

    /// Move the cursor by `delta`. Out-of-range moves do nothing and
    /// return `false`.
    pub fn go(&self, delta: isize) -> bool {
        {
            let mut entries = self.entries();
            let Some(target) = entries.cursor.checked_add_signed(delta) else {
                return false;
            };
            if delta == 0 || target >= entries.stack.len() {
                return false;
            }
            entries.cursor = target;
        }
        self.fire_popstate();
        true
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    fn fire_popstate(&self) {
        let listeners: Vec<Listener> = self
            .listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }
}

impl QuerySource for MemoryHistory {
    fn snapshot(&self) -> RawQuery {
        RawQuery::parse(self.entries().current())
    }
}

impl NavigationEvents for MemoryHistory {
    fn add_popstate_listener(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, listener));
        id
    }

    fn remove_popstate_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHistory")
            .field("entries", &*self.entries())
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}

fn normalize(search: &str) -> String {
    search.strip_prefix('?').unwrap_or(search).to_string()
}
