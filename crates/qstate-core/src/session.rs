//! Session lifecycle
//!
//! A [`Session`] binds a group set to a host [`Environment`]. `init`
//! validates the groups against the session's registry, captures the
//! current query, subscribes to the `pushState` topic and attaches a
//! popstate listener. `destroy` undoes both and is safe to call twice;
//! dropping a session destroys it.
//!
//! ## Logging Ownership
//!
//! The session owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Every event carries the session's `session_id`. Lower layers (codec,
//! type handlers) use only `tracing::debug!()`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Instant;

use qstate_core_types::schema::TOPIC_PUSH_STATE;
use qstate_core_types::{ListenerId, SessionId, SubscriptionId};
use serde::{Deserialize, Serialize};

use crate::codec::{ConvertInput, QueryCodec, RawRecord, TypedRecord};
use crate::errors::Result;
use crate::group::{Group, GroupSet};
use crate::history::Environment;
use crate::notify::{Notification, Notifier};
use crate::options::Options;
use crate::query::RawQuery;
use crate::types::{TypeDef, TypeRegistry};
use crate::{log_op_end, log_op_error, log_op_start};

/// What a session does when it hears a `pushState`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushPolicy {
    /// Diff and notify, exactly as for navigation
    #[default]
    Notify,
    /// Only refresh the current snapshot
    RefreshOnly,
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub registry: TypeRegistry,
    pub options: Options,
    pub push_policy: PushPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            registry: TypeRegistry::with_builtins(),
            options: Options::new(),
            push_policy: PushPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Option overrides, applied over the registry's defaults
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_push_policy(mut self, push_policy: PushPolicy) -> Self {
        self.push_policy = push_policy;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Navigate,
    Push,
}

impl Trigger {
    fn as_str(self) -> &'static str {
        match self {
            Trigger::Navigate => "popstate",
            Trigger::Push => TOPIC_PUSH_STATE,
        }
    }
}

struct Inner {
    id: SessionId,
    codec: QueryCodec,
    notifier: Notifier,
    env: Environment,
    push_policy: PushPolicy,
    bound: AtomicBool,
}

impl Inner {
    fn handle(&self, trigger: Trigger) -> Option<Notification> {
        if !self.bound.load(Ordering::Acquire) {
            return None;
        }
        let next = self.env.source.snapshot();

        if trigger == Trigger::Push && self.push_policy == PushPolicy::RefreshOnly {
            tracing::debug!(
                session_id = self.id.as_str(),
                trigger = trigger.as_str(),
                "snapshot refreshed"
            );
            self.notifier.set_current(next);
            return None;
        }

        log_op_start!(
            "session_notify",
            session_id = self.id.as_str(),
            trigger = trigger.as_str()
        );
        let start = Instant::now();

        let notification = self.notifier.observe(next);

        log_op_end!(
            "session_notify",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = self.id.as_str(),
            changed_count = notification.changed.len(),
            fired_count = notification.fired.len()
        );
        Some(notification)
    }
}

struct Binding {
    subscription: SubscriptionId,
    listener: ListenerId,
}

/// A group set bound to its host environment
pub struct Session {
    inner: Arc<Inner>,
    binding: Mutex<Option<Binding>>,
}

impl Session {
    /// Validate `groups`, capture the current query and start listening
    ///
    /// # Errors
    ///
    /// - `DuplicateFieldName` if two groups declare the same field
    /// - `UnknownType` if a field's type is not in `config.registry`
    pub fn init(groups: Vec<Group>, env: Environment, config: SessionConfig) -> Result<Session> {
        let id = SessionId::new();
        log_op_start!(
            "session_init",
            session_id = id.as_str(),
            group_count = groups.len()
        );
        let start = Instant::now();

        let session = Self::init_impl(id.clone(), groups, env, config).map_err(|e| {
            log_op_error!(
                "session_init",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                session_id = id.as_str()
            );
            e
        })?;

        log_op_end!(
            "session_init",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = id.as_str()
        );
        Ok(session)
    }

    fn init_impl(
        id: SessionId,
        groups: Vec<Group>,
        env: Environment,
        config: SessionConfig,
    ) -> Result<Session> {
        let groups = Arc::new(GroupSet::new(groups)?);
        let codec = QueryCodec::new(groups.clone(), config.registry, config.options)?;
        let notifier = Notifier::new(groups, env.source.snapshot());

        let inner = Arc::new(Inner {
            id,
            codec,
            notifier,
            env,
            push_policy: config.push_policy,
            bound: AtomicBool::new(true),
        });

        let on_push = Arc::downgrade(&inner);
        let subscription = inner.env.channel.subscribe(TOPIC_PUSH_STATE, move || {
            dispatch(&on_push, Trigger::Push);
        });
        let on_navigate = Arc::downgrade(&inner);
        let listener = inner.env.events.add_popstate_listener(Arc::new(move || {
            dispatch(&on_navigate, Trigger::Navigate);
        }));

        Ok(Session {
            inner,
            binding: Mutex::new(Some(Binding {
                subscription,
                listener,
            })),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.inner.id
    }

    pub fn is_bound(&self) -> bool {
        self.inner.bound.load(Ordering::Acquire)
    }

    /// Snapshot the notification layer last processed
    pub fn current(&self) -> RawQuery {
        self.inner.notifier.current()
    }

    pub fn groups(&self) -> &Arc<GroupSet> {
        self.inner.codec.groups()
    }

    /// Merged options in effect
    pub fn options(&self) -> Options {
        self.inner.codec.options()
    }

    /// Typed records for the host's current query, one per group
    ///
    /// # Errors
    ///
    /// `UnknownType` if a field's type has disappeared from the registry.
    pub fn load(&self) -> Result<Vec<TypedRecord>> {
        self.load_from(&self.inner.env.source.snapshot())
    }

    /// Typed records for an arbitrary snapshot
    ///
    /// # Errors
    ///
    /// See [`Session::load`].
    pub fn load_from(&self, raw: &RawQuery) -> Result<Vec<TypedRecord>> {
        let session_id = self.inner.id.as_str();
        log_op_start!("session_load", session_id = session_id);
        let start = Instant::now();

        let records = self.inner.codec.load(raw).map_err(|e| {
            log_op_error!(
                "session_load",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                session_id = session_id
            );
            e
        })?;

        log_op_end!(
            "session_load",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = session_id,
            group_count = records.len()
        );
        Ok(records)
    }

    /// Raw strings for typed records; see [`QueryCodec::convert`]
    ///
    /// # Errors
    ///
    /// `UnknownField` for a name no group declares.
    pub fn convert(
        &self,
        input: impl Into<ConvertInput>,
        is_merged: bool,
    ) -> Result<Vec<RawRecord>> {
        let session_id = self.inner.id.as_str();
        log_op_start!("session_convert", session_id = session_id, merged = is_merged);
        let start = Instant::now();

        let records = self.inner.codec.convert(input, is_merged).map_err(|e| {
            log_op_error!(
                "session_convert",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                session_id = session_id
            );
            e
        })?;

        log_op_end!(
            "session_convert",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = session_id
        );
        Ok(records)
    }

    /// Register or replace types for this session only
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty type name; nothing is applied then.
    pub fn extend<I, K>(&self, types: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, TypeDef)>,
        K: Into<String>,
    {
        let session_id = self.inner.id.as_str();
        log_op_start!("session_extend", session_id = session_id);
        let start = Instant::now();

        self.inner.codec.extend(types).map_err(|e| {
            log_op_error!(
                "session_extend",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                session_id = session_id
            );
            e
        })?;

        log_op_end!(
            "session_extend",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = session_id
        );
        Ok(())
    }

    /// Re-read the host's query and notify as if it had navigated
    ///
    /// Returns `None` once destroyed.
    pub fn refresh(&self) -> Option<Notification> {
        self.inner.handle(Trigger::Navigate)
    }

    /// Detach from the channel and the event source. Later calls do nothing.
    pub fn destroy(&self) {
        let binding = self
            .binding
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(binding) = binding else {
            return;
        };

        let session_id = self.inner.id.as_str();
        log_op_start!("session_destroy", session_id = session_id);
        let start = Instant::now();

        self.inner.bound.store(false, Ordering::Release);
        let env = &self.inner.env;
        env.channel.unsubscribe(TOPIC_PUSH_STATE, binding.subscription);
        env.events.remove_popstate_listener(binding.listener);

        log_op_end!(
            "session_destroy",
            duration_ms = start.elapsed().as_millis() as u64,
            session_id = session_id
        );
    }
}

fn dispatch(inner: &Weak<Inner>, trigger: Trigger) {
    if let Some(inner) = inner.upgrade() {
        inner.handle(trigger);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("bound", &self.is_bound())
            .field("push_policy", &self.inner.push_policy)
            .finish_non_exhaustive()
    }
}
