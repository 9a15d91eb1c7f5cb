//! Fetcher configuration.

use std::time::Duration;

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("feed-fetch/", env!("CARGO_PKG_VERSION"));

/// Default endpoint template for bucket/key locations.
pub const DEFAULT_OBJECT_ENDPOINT: &str = "https://{bucket}.s3.amazonaws.com/{key}";

/// Transport settings shared by all fetches of one [`Fetcher`](crate::Fetcher).
///
/// Per-resource settings (timeout, encoding) live on the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// User agent header value.
    pub user_agent: String,
    /// URL template for object locations; `{bucket}` and `{key}` are substituted.
    pub object_endpoint: String,
    /// Bound on establishing a connection, independent of the request timeout.
    pub connect_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            object_endpoint: DEFAULT_OBJECT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_object_endpoint(mut self, template: impl Into<String>) -> Self {
        self.object_endpoint = template.into();
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builds the HTTP URL for an object.
    #[must_use]
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        self.object_endpoint
            .replace("{bucket}", bucket)
            .replace("{key}", key.trim_start_matches('/'))
    }
}
