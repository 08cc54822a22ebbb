//! Uploads the schema when the remote engine does not know its hash.

use crate::{
    auth::AuthProvider,
    config::RemoteEngineConfig,
    endpoint::EndpointKind,
    error::{DataProxyError, Result},
    event_handlers::EventHandlers,
    telemetry::TelemetryCapture,
    transport::{Headers, HttpMethod, HttpRequest, HttpTransport},
};
use std::sync::Arc;

/// Idempotent `PUT .../schema` of the base64 schema text.
///
/// Nothing is cached: every call uploads again, which is harmless because
/// the target is addressed by the same hash each time.
#[derive(Clone)]
pub struct SchemaSynchronizer {
    config: Arc<RemoteEngineConfig>,
    transport: Arc<dyn HttpTransport>,
    auth: AuthProvider,
    telemetry: TelemetryCapture,
    events: EventHandlers,
}

impl SchemaSynchronizer {
    pub(crate) fn new(
        config: Arc<RemoteEngineConfig>,
        transport: Arc<dyn HttpTransport>,
        auth: AuthProvider,
        telemetry: TelemetryCapture,
        events: EventHandlers,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
            telemetry,
            events,
        }
    }

    pub async fn upload(&self) -> Result<()> {
        let request = HttpRequest {
            method: HttpMethod::Put,
            url: self.config.endpoints().url(EndpointKind::Schema),
            headers: self
                .telemetry
                .apply_to_headers(self.auth.apply_to_headers(Headers::new())),
            body: self.config.schema_base64.clone(),
        };

        let error = match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                self.events.emit_info(format!(
                    "Schema (re)uploaded (hash: {})",
                    self.config.schema_hash
                ));
                return Ok(());
            },
            Ok(response) => {
                log::debug!("[DATAPROXY_SCHEMA] upload status={}", response.status);
                DataProxyError::SchemaUpload {
                    status: Some(response.status),
                    message: response.body,
                }
            },
            Err(e) => DataProxyError::SchemaUpload {
                status: None,
                message: e.to_string(),
            },
        };

        self.events
            .emit_warn(format!("Error while uploading schema: {}", error));
        Err(error)
    }
}
