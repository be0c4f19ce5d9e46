//! Client Configuration
//!
//! Backend location and persisted storage keys.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Used when `FEEDBACK_API_URL` is not set at build time
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Storage key for the access token
pub const TOKEN_KEY: &str = "token";
/// Storage key for the refresh token
pub const REFRESH_KEY: &str = "refresh";
/// Storage key for the serialized user
pub const USER_KEY: &str = "user";

/// Unreserved characters stay as-is in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Base URL baked in at build time, falling back to the local dev server
    pub fn from_env() -> Self {
        let base = option_env!("FEEDBACK_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self::new(base)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a resource path (e.g. `feedback/3/`) onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Endpoint with a percent-encoded query string
    pub fn endpoint_with_query(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = self.endpoint(path);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.extend(utf8_percent_encode(value, QUERY_VALUE));
        }
        url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
