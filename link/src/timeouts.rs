//! Timeout configuration for data proxy requests.

use std::time::Duration;

/// Timeout configuration for HTTP calls to the data proxy.
///
/// # Examples
///
/// ```rust
/// use dataproxy_link::DataProxyTimeouts;
/// use std::time::Duration;
///
/// // Use defaults (recommended for most cases)
/// let timeouts = DataProxyTimeouts::default();
///
/// // Custom timeouts for high-latency environments
/// let timeouts = DataProxyTimeouts::builder()
///     .connection_timeout(Duration::from_secs(30))
///     .request_timeout(Duration::from_secs(120))
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataProxyTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 10 seconds
    pub connection_timeout: Duration,

    /// Timeout for one full request/response round trip.
    /// Backoff waits between attempts are not included.
    /// Default: 30 seconds
    pub request_timeout: Duration,
}

impl Default for DataProxyTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DataProxyTimeouts {
    pub fn builder() -> DataProxyTimeoutsBuilder {
        DataProxyTimeoutsBuilder::new()
    }

    /// Shorter timeouts for a proxy on the local network.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Longer timeouts for high-latency or unreliable networks.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Builder for [`DataProxyTimeouts`].
#[derive(Debug, Clone)]
pub struct DataProxyTimeoutsBuilder {
    timeouts: DataProxyTimeouts,
}

impl DataProxyTimeoutsBuilder {
    pub fn new() -> Self {
        Self {
            timeouts: DataProxyTimeouts::default(),
        }
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    pub fn build(self) -> DataProxyTimeouts {
        self.timeouts
    }
}

impl Default for DataProxyTimeoutsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
