//! Error types for the data proxy client.

use std::fmt;
use thiserror::Error;

/// Why the datasource block could not produce a connection target.
///
/// These are raised once, while the client is being built, and are never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidDatasourceReason {
    /// No single, well-formed `datasource` block was found.
    NoDatasourceBlock,
    /// `url` is absent, or points at an unset/blank environment variable.
    MissingUrl,
    /// The resolved string is not a URL.
    UnparsableUrl,
    /// The URL scheme is not `prisma`.
    WrongProtocol(String),
    /// The URL has no host component.
    MissingHost,
    /// The URL has no non-empty `api_key` query parameter.
    MissingApiKey,
}

impl fmt::Display for InvalidDatasourceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDatasourceBlock => write!(f, "no valid datasource block found in schema"),
            Self::MissingUrl => write!(f, "no URL in schema nor environment"),
            Self::UnparsableUrl => write!(f, "could not parse URL of the datasource"),
            Self::WrongProtocol(scheme) => write!(
                f,
                "datasource URL should use prisma:// protocol (got {}://)",
                scheme
            ),
            Self::MissingHost => write!(f, "no valid host found in the datasource URL"),
            Self::MissingApiKey => write!(f, "no valid API key found in the datasource URL"),
        }
    }
}

/// Errors that can occur while talking to the data proxy.
#[derive(Error, Debug)]
pub enum DataProxyError {
    #[error("Invalid datasource: {0}")]
    InvalidDatasource(InvalidDatasourceReason),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Could not upload the schema (status {status:?}): {message}")]
    SchemaUpload { status: Option<u16>, message: String },

    #[error("Schema (re)uploaded")]
    SchemaMissing,

    #[error("GraphQL request failed ({status_code}): {message}")]
    RequestFailed { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not supported by the data proxy: {0}")]
    UnsupportedOperation(String),

    #[error("Gave up after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last_error: Box<DataProxyError>,
    },
}

impl DataProxyError {
    /// Whether the retry loop should try again after this error.
    ///
    /// Upload failures are retryable because they only ever happen as the
    /// side effect of a 404 on the graphql endpoint.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SchemaUpload { .. }
                | Self::SchemaMissing
                | Self::RequestFailed { .. }
                | Self::Network(_)
        )
    }
}

impl From<InvalidDatasourceReason> for DataProxyError {
    fn from(reason: InvalidDatasourceReason) -> Self {
        Self::InvalidDatasource(reason)
    }
}

impl From<serde_json::Error> for DataProxyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for DataProxyError {
    fn from(err: reqwest::Error) -> Self {
        // Builder errors never reach the network and would fail again.
        if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type for data proxy operations
pub type Result<T> = std::result::Result<T, DataProxyError>;
