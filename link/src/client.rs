//! Main data proxy client with builder pattern.
//!
//! Provides the primary interface for sending queries to a remote,
//! proxy-hosted query engine.

use crate::{
    backoff::RetryPolicy,
    config::RemoteEngineConfig,
    datasource::EnvSource,
    error::{DataProxyError, Result},
    event_handlers::{EngineEvent, EngineEventType, EventHandlers},
    models::{
        BatchRequest, DatasourceInfo, EngineConfigInfo, QueryRequest, TransactionAction,
        TransactionInfo, TransactionOptions,
    },
    query::QueryExecutor,
    telemetry::{LogLevel, TelemetryCapture},
    timeouts::DataProxyTimeouts,
    transport::{Headers, HttpTransport, ReqwestTransport},
};
use serde_json::Value as JsonValue;
use std::{collections::HashMap, path::PathBuf, sync::Arc};

/// Main data proxy client.
///
/// Use [`DataProxyClientBuilder`] to construct instances. Construction
/// resolves the datasource once; afterwards the client only holds
/// read-only configuration and may be cloned and shared freely.
///
/// # Examples
///
/// ```rust,no_run
/// use dataproxy_link::{DataProxyClient, Headers};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DataProxyClient::builder()
///     .schema_path("prisma/schema.prisma")
///     .client_version("4.16.2")
///     .build()?;
///
/// let response = client
///     .request("query { findManyUser { id } }", Headers::new())
///     .await?;
/// println!("Result: {:?}", response);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DataProxyClient {
    config: Arc<RemoteEngineConfig>,
    query_executor: QueryExecutor,
    events: EventHandlers,
}

impl std::fmt::Debug for DataProxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProxyClient")
            .field("host", &self.config.host)
            .field("client_version", &self.config.client_version)
            .field("schema_hash", &self.config.schema_hash)
            .field("events", &self.events)
            .finish()
    }
}

impl DataProxyClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> DataProxyClientBuilder {
        DataProxyClientBuilder::new()
    }

    /// Execute a single query
    ///
    /// `headers` are sent along with the request; the client's own
    /// `Authorization` header always replaces a caller-provided one.
    pub async fn request(
        &self,
        query: impl Into<QueryRequest>,
        headers: Headers,
    ) -> Result<JsonValue> {
        self.query_executor.execute(query.into(), headers).await
    }

    /// Execute several queries in one round trip
    ///
    /// Returns one result per query, in the order they were given. With
    /// `transaction` set the remote engine applies them atomically.
    pub async fn request_batch(
        &self,
        queries: Vec<QueryRequest>,
        transaction: bool,
        headers: Headers,
    ) -> Result<Vec<JsonValue>> {
        self.query_executor
            .execute_batch(BatchRequest::new(queries, transaction), headers)
            .await
    }

    /// Interactive transactions are not available through the data proxy.
    ///
    /// Always fails, without any network call.
    pub fn transaction(
        &self,
        action: TransactionAction,
        options: Option<&TransactionOptions>,
    ) -> Result<TransactionInfo> {
        log::debug!(
            "[DATAPROXY_TX] Rejecting {} transaction (options={:?})",
            action.gerund(),
            options
        );
        Err(DataProxyError::UnsupportedOperation(
            "Interactive transactions are not supported by the data proxy".into(),
        ))
    }

    /// Upload the schema now instead of waiting for a 404.
    pub async fn upload_schema(&self) -> Result<()> {
        self.query_executor.synchronizer().upload().await
    }

    /// Register an event listener after construction.
    pub fn on(
        &self,
        event: EngineEventType,
        listener: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> Result<()> {
        match event.kind() {
            Some(kind) => {
                self.events.subscribe(kind, Arc::new(listener));
                Ok(())
            },
            None => Err(DataProxyError::UnsupportedOperation(
                "beforeExit event is not yet supported".into(),
            )),
        }
    }

    /// Metrics are collected by the remote engine and not exposed here.
    pub fn metrics(&self) -> Result<JsonValue> {
        Err(DataProxyError::UnsupportedOperation(
            "Metrics are not yet supported for the data proxy".into(),
        ))
    }

    /// The remote engine's version is not known to the client.
    pub fn version(&self) -> &'static str {
        "unknown"
    }

    pub fn get_config(&self) -> EngineConfigInfo {
        EngineConfigInfo {
            datasources: vec![DatasourceInfo {
                name: self.config.datasource_name.clone(),
                active_provider: self.config.active_provider.clone(),
            }],
        }
    }

    /// Lifecycle is managed by the remote service; nothing to start.
    pub async fn start(&self) -> Result<()> {
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    pub fn schema_hash(&self) -> &str {
        &self.config.schema_hash
    }

    pub fn client_version(&self) -> &str {
        &self.config.client_version
    }

    pub fn config(&self) -> &RemoteEngineConfig {
        &self.config
    }

    pub fn events(&self) -> &EventHandlers {
        &self.events
    }
}

/// Builder for configuring [`DataProxyClient`] instances.
pub struct DataProxyClientBuilder {
    schema_text: Option<String>,
    schema_path: Option<PathBuf>,
    client_version: String,
    env: HashMap<String, String>,
    url_overrides: HashMap<String, String>,
    retry_policy: RetryPolicy,
    timeouts: DataProxyTimeouts,
    telemetry: TelemetryCapture,
    event_handlers: EventHandlers,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl DataProxyClientBuilder {
    fn new() -> Self {
        Self {
            schema_text: None,
            schema_path: None,
            client_version: "unknown".to_string(),
            env: HashMap::new(),
            url_overrides: HashMap::new(),
            retry_policy: RetryPolicy::default(),
            timeouts: DataProxyTimeouts::default(),
            telemetry: TelemetryCapture::default(),
            event_handlers: EventHandlers::new(),
            transport: None,
        }
    }

    /// Use this schema text directly.
    pub fn schema_text(mut self, schema: impl Into<String>) -> Self {
        self.schema_text = Some(schema.into());
        self
    }

    /// Read the schema from a file once, during [`build`](Self::build).
    ///
    /// Ignored when [`schema_text`](Self::schema_text) is also set.
    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    /// Version of the hosting library; becomes part of every URL.
    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.client_version = version.into();
        self
    }

    /// Fallback variables for `env("...")` in the datasource `url`.
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Replace the `url` of the named datasource.
    pub fn datasource_url(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.url_overrides.insert(name.into(), url.into());
        self
    }

    /// Set maximum number of retries for failed requests
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.retry_policy.max_retries = retries;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn timeouts(mut self, timeouts: DataProxyTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Ask the proxy to capture engine logs at `level` and above.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.telemetry.log_level = Some(level);
        self
    }

    /// Ask the proxy to capture executed statements.
    ///
    /// They come back with each response and are emitted as query events.
    pub fn log_queries(mut self, enabled: bool) -> Self {
        self.telemetry.log_queries = enabled;
        self
    }

    /// Set the event handlers all stages report to.
    pub fn event_handlers(mut self, handlers: EventHandlers) -> Self {
        self.event_handlers = handlers;
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DataProxyClient> {
        let schema_text = match (self.schema_text, &self.schema_path) {
            (Some(text), _) => text,
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                DataProxyError::Configuration(format!(
                    "Could not read schema at {}: {}",
                    path.display(),
                    e
                ))
            })?,
            (None, None) => {
                return Err(DataProxyError::Configuration(
                    "schema_text or schema_path is required".into(),
                ))
            },
        };

        let config = Arc::new(RemoteEngineConfig::resolve(
            schema_text,
            &self.client_version,
            &EnvSource::new(self.env),
            &self.url_overrides,
        )?);

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.timeouts)?),
        };

        log::debug!(
            "[CLIENT] host={} client_version={} max_retries={}",
            config.host,
            config.client_version,
            self.retry_policy.max_retries
        );

        let query_executor = QueryExecutor::new(
            Arc::clone(&config),
            transport,
            self.event_handlers.clone(),
            self.retry_policy,
            self.telemetry,
        );

        Ok(DataProxyClient {
            config,
            query_executor,
            events: self.event_handlers,
        })
    }
}
