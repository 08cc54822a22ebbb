use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Response body of a batch request.
///
/// `batch_result` has one entry per submitted query, in submission order.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    #[serde(rename = "batchResult")]
    pub batch_result: Vec<JsonValue>,
}
