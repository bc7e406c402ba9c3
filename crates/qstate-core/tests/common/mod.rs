#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use qstate_core::{Environment, Group, MemoryHistory, Session, SessionConfig, Value};

/// Callback counter shared with a group
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn group(&self, name: &str) -> Group {
        let count = self.0.clone();
        Group::new(name, move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// `pager` (page, size) and `filter` (tags, q) over an in-memory history
pub struct Fixture {
    pub history: Arc<MemoryHistory>,
    pub pager: Counter,
    pub filter: Counter,
    pub session: Session,
}

impl Fixture {
    pub fn new(initial: &str) -> Self {
        Self::with_config(initial, SessionConfig::new())
    }

    pub fn with_config(initial: &str, config: SessionConfig) -> Self {
        let history = Arc::new(MemoryHistory::standalone(initial));
        let pager = Counter::new();
        let filter = Counter::new();
        let groups = vec![
            pager
                .group("pager")
                .field("page", "Int", 1i64)
                .field("size", "Int", 20i64),
            filter
                .group("filter")
                .field("tags", "Array", Value::List(vec![]))
                .field("q", "String", ""),
        ];
        let session = Session::init(groups, Environment::memory(&history), config).unwrap();
        Self {
            history,
            pager,
            filter,
            session,
        }
    }
}
