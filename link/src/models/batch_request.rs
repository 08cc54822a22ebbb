use serde::{Deserialize, Serialize};

use super::query_request::QueryRequest;

/// Several queries sent in one round trip.
///
/// With `transaction` set, the remote engine applies them atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub batch: Vec<QueryRequest>,
    pub transaction: bool,
}

impl BatchRequest {
    pub fn new(queries: Vec<QueryRequest>, transaction: bool) -> Self {
        Self {
            batch: queries,
            transaction,
        }
    }

    /// Text used for the `query` event of a batch.
    pub fn describe(&self) -> String {
        let queries: Vec<&str> = self.batch.iter().map(|q| q.query.as_str()).collect();
        format!(
            "Batch{} ({}):\n{}",
            if self.transaction { " in transaction" } else { "" },
            self.batch.len(),
            queries.join("\n")
        )
    }
}
