//! Query execution against the remote graphql endpoint, with retries.
//!
//! Each logical call runs an explicit attempt loop. An attempt ends in one
//! of three [`AttemptOutcome`]s; a 404 means the remote engine does not know
//! the schema hash yet, so the schema is uploaded and the attempt counts as
//! a failure against the same retry budget.

use crate::{
    auth::AuthProvider,
    backoff::RetryPolicy,
    config::RemoteEngineConfig,
    endpoint::EndpointKind,
    error::{DataProxyError, Result},
    event_handlers::EventHandlers,
    models::{BatchRequest, BatchResponse, QueryRequest, RequestEnvelope},
    schema_sync::SchemaSynchronizer,
    telemetry::{self, TelemetryCapture},
    transport::{validate_headers, Headers, HttpMethod, HttpRequest, HttpTransport},
};
use log::debug;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;

const NOT_FOUND: u16 = 404;

/// Result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Ok(JsonValue),
    NeedsResync,
    Failure(DataProxyError),
}

/// Attempt counter of one logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempt: u32,
    pub max_retries: u32,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_retries
    }

    pub fn advance(&mut self) {
        self.attempt += 1;
    }
}

/// Handles query execution via HTTP.
#[derive(Clone)]
pub struct QueryExecutor {
    config: Arc<RemoteEngineConfig>,
    transport: Arc<dyn HttpTransport>,
    auth: AuthProvider,
    telemetry: TelemetryCapture,
    events: EventHandlers,
    synchronizer: SchemaSynchronizer,
    retry_policy: RetryPolicy,
}

impl QueryExecutor {
    pub(crate) fn new(
        config: Arc<RemoteEngineConfig>,
        transport: Arc<dyn HttpTransport>,
        events: EventHandlers,
        retry_policy: RetryPolicy,
        telemetry: TelemetryCapture,
    ) -> Self {
        let auth = AuthProvider::api_key(config.api_key.clone());
        let synchronizer = SchemaSynchronizer::new(
            Arc::clone(&config),
            Arc::clone(&transport),
            auth.clone(),
            telemetry,
            events.clone(),
        );
        Self {
            config,
            transport,
            auth,
            telemetry,
            events,
            synchronizer,
            retry_policy,
        }
    }

    pub fn synchronizer(&self) -> &SchemaSynchronizer {
        &self.synchronizer
    }

    /// Execute one query; returns the parsed response body.
    pub async fn execute(&self, request: QueryRequest, headers: Headers) -> Result<JsonValue> {
        self.execute_envelope(RequestEnvelope::Single(request), headers)
            .await
    }

    /// Execute a batch; returns one result per query, in submission order.
    pub async fn execute_batch(
        &self,
        batch: BatchRequest,
        headers: Headers,
    ) -> Result<Vec<JsonValue>> {
        let body = self
            .execute_envelope(RequestEnvelope::Batch(batch), headers)
            .await?;
        let response: BatchResponse = serde_json::from_value(body)?;
        Ok(response.batch_result)
    }

    async fn execute_envelope(
        &self,
        envelope: RequestEnvelope,
        headers: Headers,
    ) -> Result<JsonValue> {
        let url = self.config.endpoints().url(EndpointKind::Graphql);
        let body = serde_json::to_string(&envelope)?;
        validate_headers(&headers)?;
        let mut headers = self
            .telemetry
            .apply_to_headers(self.auth.apply_to_headers(headers));
        if !headers.keys().any(|name| name.eq_ignore_ascii_case("content-type")) {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        let description = envelope.describe();

        let mut state = RetryState::new(self.retry_policy.max_retries);
        let overall_start = Instant::now();

        loop {
            self.events.emit_query(&description);
            self.events
                .emit_info(format!("Calling {} (n={})", url, state.attempt));

            let request = HttpRequest {
                method: HttpMethod::Post,
                url: url.clone(),
                headers: headers.clone(),
                body: body.clone(),
            };

            let error = match self.attempt(request).await {
                AttemptOutcome::Ok(value) => {
                    debug!(
                        "[DATAPROXY_QUERY] Success after {} attempt(s) total_ms={}",
                        state.attempt + 1,
                        overall_start.elapsed().as_millis()
                    );
                    return Ok(value);
                },
                AttemptOutcome::NeedsResync => match self.synchronizer.upload().await {
                    Ok(()) => DataProxyError::SchemaMissing,
                    Err(upload_error) => upload_error,
                },
                AttemptOutcome::Failure(e) if e.is_retryable() => e,
                AttemptOutcome::Failure(e) => return Err(e),
            };

            if state.is_exhausted() {
                self.events
                    .emit_error(format!("Failed to query: {}", error));
                return Err(DataProxyError::ExhaustedRetries {
                    attempts: state.attempt + 1,
                    last_error: Box::new(error),
                });
            }

            self.events.emit_warn(format!(
                "Attempt {}/{} failed for querying: {}",
                state.attempt + 1,
                state.max_retries,
                error
            ));

            let delay = self.retry_policy.delay(state.attempt);
            self.events
                .emit_warn(format!("Retrying after {}ms", delay.as_millis()));
            tokio::time::sleep(delay).await;
            state.advance();
        }
    }

    async fn attempt(&self, request: HttpRequest) -> AttemptOutcome {
        let attempt_start = Instant::now();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Failure(e),
        };
        debug!(
            "[DATAPROXY_HTTP] Response received: status={} duration_ms={}",
            response.status,
            attempt_start.elapsed().as_millis()
        );

        if response.status == NOT_FOUND {
            return AttemptOutcome::NeedsResync;
        }
        if !response.is_success() {
            let message = if response.body.is_empty() {
                "GraphQL request failed".to_string()
            } else {
                response.body
            };
            return AttemptOutcome::Failure(DataProxyError::RequestFailed {
                status_code: response.status,
                message,
            });
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => {
                telemetry::propagate_response_extensions(&value, &self.events);
                AttemptOutcome::Ok(value)
            },
            Err(e) => AttemptOutcome::Failure(e.into()),
        }
    }
}
