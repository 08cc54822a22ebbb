use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One query as sent to the graphql endpoint.
///
/// # Examples
///
/// ```rust
/// use dataproxy_link::QueryRequest;
///
/// let request = QueryRequest::new("query { findManyUser { id } }");
/// assert!(request.variables.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,

    /// Query variables; sent as `{}` when empty.
    #[serde(default)]
    pub variables: Map<String, JsonValue>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    pub fn with_variables(mut self, variables: Map<String, JsonValue>) -> Self {
        self.variables = variables;
        self
    }
}

impl From<&str> for QueryRequest {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for QueryRequest {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}
