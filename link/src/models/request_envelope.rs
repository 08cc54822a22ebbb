use serde::Serialize;

use super::{batch_request::BatchRequest, query_request::QueryRequest};

/// Body of a `POST .../graphql` call.
///
/// Serialized without a tag: `{query, variables}` or `{batch, transaction}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestEnvelope {
    Single(QueryRequest),
    Batch(BatchRequest),
}

impl RequestEnvelope {
    pub fn is_batch(&self) -> bool {
        matches!(self, RequestEnvelope::Batch(_))
    }

    /// Text used for the `query` event.
    pub fn describe(&self) -> String {
        match self {
            RequestEnvelope::Single(request) => request.query.clone(),
            RequestEnvelope::Batch(batch) => batch.describe(),
        }
    }
}
