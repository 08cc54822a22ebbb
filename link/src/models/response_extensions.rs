use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// `extensions` object the proxy attaches to a successful response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseExtensions {
    #[serde(default)]
    pub logs: Vec<ProxyLog>,
}

/// One engine log line captured by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyLog {
    pub level: String,
    #[serde(default)]
    pub timestamp: JsonValue,
    #[serde(default)]
    pub attributes: Map<String, JsonValue>,
}
