//! Data models for the data proxy client.
//!
//! Request envelopes sent to the graphql endpoint, the batch response
//! shape with its captured logs, and the types of the unsupported
//! transaction API.

pub mod batch_request;
pub mod batch_response;
pub mod engine_config;
pub mod query_request;
pub mod request_envelope;
pub mod response_extensions;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use batch_request::BatchRequest;
pub use batch_response::BatchResponse;
pub use engine_config::{DatasourceInfo, EngineConfigInfo};
pub use query_request::QueryRequest;
pub use request_envelope::RequestEnvelope;
pub use response_extensions::{ProxyLog, ResponseExtensions};
pub use transaction::{TransactionAction, TransactionInfo, TransactionOptions};
