//! Engine event handlers for the data proxy client.
//!
//! Four event kinds are emitted while a request is in flight:
//!
//! - [`EventKind::Query`]: the query (or batch) about to be sent
//! - [`EventKind::Info`]: endpoint calls and successful schema uploads
//! - [`EventKind::Warn`]: failed attempts and retry delays
//! - [`EventKind::Error`]: a request that gave up after the last retry
//!
//! # Example
//!
//! ```rust
//! use dataproxy_link::{EventHandlers, EventKind};
//!
//! let handlers = EventHandlers::new()
//!     .on_query(|event| println!("query: {}", event.payload["query"]))
//!     .on(EventKind::Warn, |event| eprintln!("warn: {}", event.message()));
//! ```

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Kind of an engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Query,
    Info,
    Warn,
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Query => write!(f, "query"),
            EventKind::Info => write!(f, "info"),
            EventKind::Warn => write!(f, "warn"),
            EventKind::Error => write!(f, "error"),
        }
    }
}

/// Event names a caller may subscribe to on the client.
///
/// `BeforeExit` exists for parity with local engines and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEventType {
    Query,
    Info,
    Warn,
    Error,
    BeforeExit,
}

impl EngineEventType {
    pub(crate) fn kind(self) -> Option<EventKind> {
        match self {
            EngineEventType::Query => Some(EventKind::Query),
            EngineEventType::Info => Some(EventKind::Info),
            EngineEventType::Warn => Some(EventKind::Warn),
            EngineEventType::Error => Some(EventKind::Error),
            EngineEventType::BeforeExit => None,
        }
    }
}

/// A single emitted event.
#[derive(Debug, Clone, Serialize)]
pub struct EngineEvent {
    pub kind: EventKind,
    pub payload: Value,
}

impl EngineEvent {
    /// The `message` field of the payload, or the `query` field for query events.
    pub fn message(&self) -> &str {
        self.payload
            .get("message")
            .or_else(|| self.payload.get("query"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Type alias for an event listener.
pub type EventListener = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Registry of listeners, shared by every stage of a client.
///
/// Cloning is cheap and clones share the same registry. A no-op listener is
/// always attached to [`EventKind::Error`], so an error event never goes
/// unobserved.
#[derive(Clone)]
pub struct EventHandlers {
    listeners: Arc<RwLock<HashMap<EventKind, Vec<EventListener>>>>,
}

impl Default for EventHandlers {
    fn default() -> Self {
        let noop: EventListener = Arc::new(|_: &EngineEvent| {});
        let mut listeners: HashMap<EventKind, Vec<EventListener>> = HashMap::new();
        listeners.insert(EventKind::Error, vec![noop]);
        Self {
            listeners: Arc::new(RwLock::new(listeners)),
        }
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("query", &self.listener_count(EventKind::Query))
            .field("info", &self.listener_count(EventKind::Info))
            .field("warn", &self.listener_count(EventKind::Warn))
            .field("error", &self.listener_count(EventKind::Error))
            .finish()
    }
}

impl EventHandlers {
    /// Create handlers with only the default error listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `kind`. Listeners run in registration order.
    pub fn on(self, kind: EventKind, f: impl Fn(&EngineEvent) + Send + Sync + 'static) -> Self {
        self.subscribe(kind, Arc::new(f));
        self
    }

    pub fn on_query(self, f: impl Fn(&EngineEvent) + Send + Sync + 'static) -> Self {
        self.on(EventKind::Query, f)
    }

    pub fn on_info(self, f: impl Fn(&EngineEvent) + Send + Sync + 'static) -> Self {
        self.on(EventKind::Info, f)
    }

    pub fn on_warn(self, f: impl Fn(&EngineEvent) + Send + Sync + 'static) -> Self {
        self.on(EventKind::Warn, f)
    }

    pub fn on_error(self, f: impl Fn(&EngineEvent) + Send + Sync + 'static) -> Self {
        self.on(EventKind::Error, f)
    }

    /// Register a listener on an existing registry.
    pub fn subscribe(&self, kind: EventKind, listener: EventListener) {
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.entry(kind).or_default().push(listener);
    }

    /// Number of listeners registered for `kind`, including the default one.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        match self.listeners.read() {
            Ok(guard) => guard.get(&kind).map_or(0, Vec::len),
            Err(poisoned) => poisoned.into_inner().get(&kind).map_or(0, Vec::len),
        }
    }

    // ---------------------------------------------------------------
    // Internal dispatch helpers
    // ---------------------------------------------------------------

    pub(crate) fn emit(&self, kind: EventKind, payload: Value) {
        let event = EngineEvent { kind, payload };
        match kind {
            EventKind::Query | EventKind::Info => {
                log::debug!("[DATAPROXY_EVENT] {}: {}", kind, event.message())
            },
            EventKind::Warn => log::warn!("[DATAPROXY_EVENT] {}", event.message()),
            EventKind::Error => log::error!("[DATAPROXY_EVENT] {}", event.message()),
        }

        // Snapshot so listeners may subscribe from inside a callback.
        let snapshot: Vec<EventListener> = match self.listeners.read() {
            Ok(guard) => guard.get(&kind).cloned().unwrap_or_default(),
            Err(poisoned) => poisoned.into_inner().get(&kind).cloned().unwrap_or_default(),
        };
        for listener in snapshot {
            listener(&event);
        }
    }

    pub(crate) fn emit_query(&self, query: &str) {
        self.emit(EventKind::Query, json!({ "query": query }));
    }

    pub(crate) fn emit_info(&self, message: impl Into<String>) {
        self.emit(EventKind::Info, json!({ "message": message.into() }));
    }

    pub(crate) fn emit_warn(&self, message: impl Into<String>) {
        self.emit(EventKind::Warn, json!({ "message": message.into() }));
    }

    pub(crate) fn emit_error(&self, message: impl Into<String>) {
        self.emit(EventKind::Error, json!({ "message": message.into() }));
    }
}
