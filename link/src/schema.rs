//! Content addressing of the schema text.

use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

/// Base64 form and content hash of a schema, computed once.
///
/// The remote service addresses schemas by `schema_hash`, so equal text
/// always maps to the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVersion {
    pub schema_base64: String,
    pub schema_hash: String,
}

impl SchemaVersion {
    pub fn new(schema_text: &str) -> Self {
        let schema_base64 = general_purpose::STANDARD.encode(schema_text.as_bytes());
        let schema_hash = hex::encode(Sha256::digest(schema_base64.as_bytes()));
        Self {
            schema_base64,
            schema_hash,
        }
    }
}
