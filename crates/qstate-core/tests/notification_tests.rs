//! Notification Tests
//!
//! This test suite verifies how sessions react to navigation and pushes.
//!
//! ## Scenarios Covered
//!
//! 1. A change in one group fires only that group's callback
//! 2. Several changed fields in one group fire its callback once
//! 3. Back/forward navigation notifies like a push
//! 4. Destroy is idempotent and silences callbacks
//! 5. A callback that pushes state does not deadlock
//! 6. RefreshOnly pushes refresh the snapshot without callbacks

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use common::{Counter, Fixture};
use qstate_core::{
    Environment, Group, MemoryHistory, PushPolicy, RawQuery, Session, SessionConfig, Value,
};

#[test]
fn test_page_change_fires_pager_only() {
    // GIVEN a session observing ?page=1
    let fx = Fixture::new("?page=1");

    // WHEN page changes
    fx.history.push_state("?page=2");

    // THEN only the pager callback fires
    assert_eq!(fx.pager.get(), 1);
    assert_eq!(fx.filter.get(), 0);

    let records = fx.session.load().unwrap();
    assert_eq!(records[0]["page"], Value::Int(2));
    assert_eq!(records[1]["tags"], Value::List(vec![]));
}

#[test]
fn test_two_fields_in_one_group_fire_once() {
    let fx = Fixture::new("page=1&size=20");
    fx.history.push_state("page=2&size=50");
    assert_eq!(fx.pager.get(), 1);
}

#[test]
fn test_change_in_each_group_fires_each_once() {
    let fx = Fixture::new("");
    fx.history.push_state("page=2&tags=a,b&q=x");
    assert_eq!(fx.pager.get(), 1);
    assert_eq!(fx.filter.get(), 1);
}

#[test]
fn test_unknown_parameter_fires_nothing() {
    let fx = Fixture::new("page=1");
    fx.history.push_state("page=1&utm_source=mail");
    assert_eq!(fx.pager.get() + fx.filter.get(), 0);
    assert_eq!(fx.session.current().get("utm_source"), Some("mail"));
}

#[test]
fn test_removal_counts_as_change() {
    let fx = Fixture::new("q=shoes");
    fx.history.push_state("");
    assert_eq!(fx.filter.get(), 1);
}

#[test]
fn test_empty_value_differs_from_absent() {
    let fx = Fixture::new("");
    fx.history.push_state("q=");
    assert_eq!(fx.filter.get(), 1);
}

#[test]
fn test_back_and_forward_notify() {
    let fx = Fixture::new("page=1");
    fx.history.push_state("page=2");
    assert_eq!(fx.pager.get(), 1);

    assert!(fx.history.back());
    assert_eq!(fx.pager.get(), 2);
    assert_eq!(fx.session.current().get("page"), Some("1"));

    assert!(fx.history.forward());
    assert_eq!(fx.pager.get(), 3);
}

#[test]
fn test_replace_state_is_picked_up_on_next_event() {
    let fx = Fixture::new("page=1");
    fx.history.replace_state("page=5");
    assert_eq!(fx.pager.get(), 0);

    fx.history.push_state("page=5&q=x");
    assert_eq!(fx.pager.get(), 1);
    assert_eq!(fx.filter.get(), 1);
}

#[test]
fn test_destroy_twice_is_noop() {
    let fx = Fixture::new("page=1");
    fx.session.destroy();
    fx.session.destroy();

    assert!(!fx.session.is_bound());
    assert_eq!(fx.history.listener_count(), 0);
}

#[test]
fn test_no_callbacks_after_destroy() {
    let fx = Fixture::new("page=1");
    fx.session.destroy();

    fx.history.push_state("page=2");
    fx.history.back();

    assert_eq!(fx.pager.get(), 0);
    assert!(fx.session.refresh().is_none());
}

#[test]
fn test_refresh_reads_host_query() {
    let fx = Fixture::new("page=1");
    fx.history.replace_state("page=3");

    let notification = fx.session.refresh().unwrap();
    assert_eq!(notification.fired, vec![0]);
    assert_eq!(fx.pager.get(), 1);
}

#[test]
fn test_refresh_only_policy_skips_callbacks_on_push() {
    let fx = Fixture::with_config(
        "page=1",
        SessionConfig::new().with_push_policy(PushPolicy::RefreshOnly),
    );

    fx.history.push_state("page=2");
    assert_eq!(fx.pager.get(), 0);
    assert_eq!(fx.session.current().get("page"), Some("2"));

    // navigation still notifies
    fx.history.back();
    assert_eq!(fx.pager.get(), 1);
}

#[test]
fn test_callback_pushing_state_does_not_deadlock() {
    // GIVEN a pager callback that normalizes size whenever page changes
    let history = Arc::new(MemoryHistory::standalone("page=1&size=20"));
    let weak: Weak<MemoryHistory> = Arc::downgrade(&history);
    let calls = Arc::new(AtomicUsize::new(0));
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();

    let calls_in = calls.clone();
    let seen_in = seen.clone();
    let pager = Group::new("pager", move || {
        calls_in.fetch_add(1, Ordering::SeqCst);
        if let Some(history) = weak.upgrade() {
            let search = history.location_search();
            seen_in.lock().unwrap().push(search.clone());
            let query = RawQuery::parse(&search);
            if query.get("size") != Some("10") {
                history.push_query(&query.with("size", "10"));
            }
        }
    })
    .field("page", "Int", 1i64)
    .field("size", "Int", 20i64);

    let session = Session::init(
        vec![pager],
        Environment::memory(&history),
        SessionConfig::new(),
    )
    .unwrap();

    // WHEN page changes
    history.push_state("page=2&size=20");

    // THEN the nested push was observed and the cycle settled
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.current().get("size"), Some("10"));
    assert_eq!(session.current().get("page"), Some("2"));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn test_callback_sees_current_snapshot() {
    let history = Arc::new(MemoryHistory::standalone("page=1"));
    let slot: Arc<Mutex<Option<Weak<Session>>>> = Arc::default();
    let observed: Arc<Mutex<Option<String>>> = Arc::default();

    let slot_in = slot.clone();
    let observed_in = observed.clone();
    let pager = Group::new("pager", move || {
        let session = slot_in.lock().unwrap().as_ref().and_then(Weak::upgrade);
        if let Some(session) = session {
            *observed_in.lock().unwrap() = session.current().get("page").map(str::to_string);
        }
    })
    .field("page", "Int", 1i64);

    let session = Arc::new(
        Session::init(vec![pager], Environment::memory(&history), SessionConfig::new()).unwrap(),
    );
    *slot.lock().unwrap() = Some(Arc::downgrade(&session));

    history.push_state("page=7");
    assert_eq!(observed.lock().unwrap().as_deref(), Some("7"));
}

#[test]
fn test_sessions_on_one_history_are_independent() {
    let history = Arc::new(MemoryHistory::standalone("page=1"));
    let a = Counter::new();
    let b = Counter::new();

    let first = Session::init(
        vec![a.group("pager").field("page", "Int", 1i64)],
        Environment::memory(&history),
        SessionConfig::new(),
    )
    .unwrap();
    let _second = Session::init(
        vec![b.group("pager").field("page", "Int", 1i64)],
        Environment::memory(&history),
        SessionConfig::new(),
    )
    .unwrap();

    first.destroy();
    history.push_state("page=2");

    assert_eq!(a.get(), 0);
    assert_eq!(b.get(), 1);
}
