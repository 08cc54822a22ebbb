//! Telemetry the proxy captures on the client's behalf.
//!
//! With a log level or query logging enabled, every request carries an
//! `X-capture-telemetry` header. The proxy then attaches the engine's logs
//! to successful responses under `extensions.logs`; entries of level
//! `query` are re-emitted locally as [`EventKind::Query`] events.

use crate::event_handlers::{EventHandlers, EventKind};
use crate::models::{ProxyLog, ResponseExtensions};
use crate::transport::Headers;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;

pub const CAPTURE_TELEMETRY_HEADER: &str = "X-capture-telemetry";

/// Suffix the remote engine appends to SQL when it traces a statement.
const TRACEPARENT_MARKER: &str = "/* traceparent";

/// Minimum level of engine logs the proxy should capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Query,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Query => write!(f, "query"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// What the proxy is asked to capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetryCapture {
    pub log_level: Option<LogLevel>,
    pub log_queries: bool,
}

impl TelemetryCapture {
    /// Header value, e.g. `"info, query"`, or `None` when nothing is captured.
    pub fn header_value(&self) -> Option<String> {
        let mut settings = Vec::new();
        if let Some(level) = self.log_level {
            settings.push(level.to_string());
        }
        if self.log_queries {
            settings.push("query".to_string());
        }
        if settings.is_empty() {
            None
        } else {
            Some(settings.join(", "))
        }
    }

    pub fn apply_to_headers(&self, mut headers: Headers) -> Headers {
        if let Some(value) = self.header_value() {
            headers.retain(|name, _| !name.eq_ignore_ascii_case(CAPTURE_TELEMETRY_HEADER));
            headers.insert(CAPTURE_TELEMETRY_HEADER.to_string(), value);
        }
        headers
    }
}

/// Re-emit the query logs attached to a successful response body.
///
/// The body itself is left untouched. Bodies without usable extensions
/// are ignored.
pub(crate) fn propagate_response_extensions(body: &JsonValue, events: &EventHandlers) {
    let Some(raw) = body.get("extensions") else {
        return;
    };
    let extensions: ResponseExtensions = match serde_json::from_value(raw.clone()) {
        Ok(extensions) => extensions,
        Err(e) => {
            log::debug!("[DATAPROXY_TELEMETRY] Ignoring malformed extensions: {}", e);
            return;
        },
    };

    for entry in extensions.logs.iter().filter(|entry| entry.level == "query") {
        events.emit(EventKind::Query, query_event_payload(entry));
    }
}

fn query_event_payload(entry: &ProxyLog) -> JsonValue {
    let query = entry
        .attributes
        .get("query")
        .and_then(JsonValue::as_str)
        .unwrap_or_default();
    json!({
        "query": strip_traceparent(query),
        "timestamp": entry.timestamp,
        "duration": entry.attributes.get("duration_ms"),
        "params": entry.attributes.get("params"),
        "target": entry.attributes.get("target"),
    })
}

/// `SELECT 1 /* traceparent=00-... */` becomes `SELECT 1 `.
pub fn strip_traceparent(query: &str) -> &str {
    match query.find(TRACEPARENT_MARKER) {
        Some(index) => &query[..index],
        None => query,
    }
}
