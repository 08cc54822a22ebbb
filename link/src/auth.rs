//! Bearer authentication for the data proxy.
//!
//! Every request, including schema uploads, carries
//! `Authorization: Bearer <api_key>`.

use crate::transport::Headers;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// API key taken from the datasource URL.
#[derive(Clone)]
pub struct AuthProvider {
    api_key: String,
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider").field("api_key", &"***").finish()
    }
}

impl AuthProvider {
    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.api_key
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Merge the bearer header into caller headers.
    ///
    /// Any caller `Authorization` header is replaced, whatever its casing.
    pub fn apply_to_headers(&self, mut headers: Headers) -> Headers {
        headers.retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
        headers.insert(AUTHORIZATION_HEADER.to_string(), self.header_value());
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let auth = AuthProvider::api_key("secret");
        assert_eq!(auth.header_value(), "Bearer secret");
        assert!(!format!("{:?}", auth).contains("secret"));
    }

    #[test]
    fn test_bearer_wins_on_conflict() {
        let auth = AuthProvider::api_key("secret");
        let mut caller = Headers::new();
        caller.insert("authorization".into(), "Basic Zm9vOmJhcg==".into());
        caller.insert("traceparent".into(), "00-abc-def-01".into());

        let merged = auth.apply_to_headers(caller);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("Authorization").map(String::as_str), Some("Bearer secret"));
        assert_eq!(merged.get("traceparent").map(String::as_str), Some("00-abc-def-01"));
    }
}
