//! # dataproxy-link
//!
//! Client for a remote, proxy-hosted query engine reached over HTTPS.
//!
//! The target host and API key come from the `datasource` block of the
//! schema. Requests are addressed by a content hash of the schema; when the
//! remote engine answers 404 the schema is uploaded and the request is
//! retried with exponential backoff.
//!
//! ```rust,no_run
//! use dataproxy_link::{DataProxyClient, EventHandlers, Headers, QueryRequest};
//!
//! # async fn example() -> dataproxy_link::Result<()> {
//! let client = DataProxyClient::builder()
//!     .schema_path("prisma/schema.prisma")
//!     .client_version("4.16.2")
//!     .event_handlers(EventHandlers::new().on_warn(|e| eprintln!("{}", e.message())))
//!     .build()?;
//!
//! let results = client
//!     .request_batch(
//!         vec![
//!             QueryRequest::new("query { findManyUser { id } }"),
//!             QueryRequest::new("query { findManyPost { id } }"),
//!         ],
//!         true,
//!         Headers::new(),
//!     )
//!     .await?;
//! assert_eq!(results.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod backoff;
pub mod client;
pub mod config;
pub mod datasource;
pub mod endpoint;
pub mod error;
pub mod event_handlers;
pub mod models;
pub mod query;
pub mod schema;
pub mod schema_sync;
pub mod telemetry;
pub mod timeouts;
pub mod transport;

pub use auth::AuthProvider;
pub use backoff::{RetryPolicy, BACKOFF_INTERVAL};
pub use client::{DataProxyClient, DataProxyClientBuilder};
pub use config::RemoteEngineConfig;
pub use datasource::{ConnectionTarget, EnvSource};
pub use endpoint::{normalize_client_version, EndpointBuilder, EndpointKind};
pub use error::{DataProxyError, InvalidDatasourceReason, Result};
pub use event_handlers::{EngineEvent, EngineEventType, EventHandlers, EventKind, EventListener};
pub use models::{
    BatchRequest, ProxyLog, QueryRequest, RequestEnvelope, ResponseExtensions, TransactionAction,
    TransactionInfo, TransactionOptions,
};
pub use query::{AttemptOutcome, QueryExecutor, RetryState};
pub use schema::SchemaVersion;
pub use schema_sync::SchemaSynchronizer;
pub use telemetry::{LogLevel, TelemetryCapture};
pub use timeouts::DataProxyTimeouts;
pub use transport::{
    validate_headers, Headers, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    ReqwestTransport,
};
