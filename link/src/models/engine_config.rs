use serde::{Deserialize, Serialize};

/// One datasource as reported by [`DataProxyClient::get_config`](crate::DataProxyClient::get_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceInfo {
    pub name: String,
    #[serde(rename = "activeProvider")]
    pub active_provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfigInfo {
    pub datasources: Vec<DatasourceInfo>,
}
