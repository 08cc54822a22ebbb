//! Versioned endpoint URLs of the remote query engine.

use std::fmt;

/// Used when the caller's version cannot address a remote endpoint.
pub const BASELINE_CLIENT_VERSION: &str = "3.2.0";

/// Normalize the library version used as a URL path segment.
///
/// Only plain `major.minor.patch` (no leading zero on major) is passed
/// through. Pre-release builds and anything irregular fall back to
/// [`BASELINE_CLIENT_VERSION`].
pub fn normalize_client_version(version: &str) -> String {
    let mut parts = version.splitn(2, '-');
    let core = parts.next().unwrap_or_default();
    let has_suffix = parts.next().is_some();

    if !has_suffix && is_plain_semver(core) {
        core.to_string()
    } else {
        BASELINE_CLIENT_VERSION.to_string()
    }
}

fn is_plain_semver(version: &str) -> bool {
    let segments: Vec<&str> = version.split('.').collect();
    if segments.len() != 3 {
        return false;
    }
    if segments.iter().any(|s| s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit())) {
        return false;
    }
    !segments[0].starts_with('0')
}

/// Operations addressable under a schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Schema,
    Graphql,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Schema => "schema",
            EndpointKind::Graphql => "graphql",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composes `https://{host}/{version}/{hash}/{op}` URLs.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    prefix: String,
}

impl EndpointBuilder {
    pub fn new(host: &str, client_version: &str, schema_hash: &str) -> Self {
        Self {
            prefix: format!("https://{}/{}/{}", host, client_version, schema_hash),
        }
    }

    pub fn url(&self, kind: EndpointKind) -> String {
        format!("{}/{}", self.prefix, kind.as_str())
    }
}
