//! Immutable configuration derived once from the schema text.

use crate::{
    datasource::{self, DatasourceValue, EnvSource},
    endpoint::{normalize_client_version, EndpointBuilder},
    error::{DataProxyError, Result},
    schema::SchemaVersion,
};
use std::collections::HashMap;

/// Everything the client needs to address the remote engine.
///
/// Built once by the client builder and shared read-only between
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct RemoteEngineConfig {
    pub schema_text: String,
    pub schema_base64: String,
    pub schema_hash: String,
    pub host: String,
    pub api_key: String,
    pub client_version: String,
    pub datasource_name: String,
    pub active_provider: Option<String>,
}

impl RemoteEngineConfig {
    /// Resolve host and key from `schema_text` and version it.
    ///
    /// `url_overrides` maps datasource names to literal URLs that replace
    /// the schema's own `url`.
    pub fn resolve(
        schema_text: String,
        client_version: &str,
        env: &EnvSource,
        url_overrides: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut block = datasource::parse_datasource(&schema_text)?;

        for (name, url) in url_overrides {
            if *name != block.name {
                return Err(DataProxyError::Configuration(format!(
                    "Unknown datasource: {}",
                    name
                )));
            }
            block.assignments.retain(|(key, _)| key != "url");
            block
                .assignments
                .push(("url".to_string(), DatasourceValue::Literal(url.clone())));
        }

        let url = datasource::resolve_datasource_url(&block, env)?;
        let target = datasource::parse_connection_url(&url)?;
        let version = SchemaVersion::new(&schema_text);

        log::debug!(
            "[DATAPROXY_CONFIG] datasource={} host={} schema_hash={}",
            block.name,
            target.host,
            version.schema_hash
        );

        Ok(Self {
            active_provider: block.provider().map(str::to_string),
            datasource_name: block.name,
            schema_text,
            schema_base64: version.schema_base64,
            schema_hash: version.schema_hash,
            host: target.host,
            api_key: target.api_key,
            client_version: normalize_client_version(client_version),
        })
    }

    pub fn endpoints(&self) -> EndpointBuilder {
        EndpointBuilder::new(&self.host, &self.client_version, &self.schema_hash)
    }
}
