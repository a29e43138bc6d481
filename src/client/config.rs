//! Client configuration.

use crate::config::{ApiSettings, NifiSettings};
use crate::types::Headers;

/// Settings for one [`ApiClient`](crate::client::ApiClient) instance.
///
/// The timeout applies to every request made through the client; there is no
/// per-call override.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Whole-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Headers sent with every request, before any per-call headers
    pub default_headers: Headers,
    /// Emit per-request debug logs
    pub enable_logging: bool,
}

impl ClientConfig {
    /// Configuration for `base_url` with default timeout and no extra headers.
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Add a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: ApiSettings::default().base_url,
            request_timeout_ms: 30_000,
            default_headers: Headers::new(),
            enable_logging: true,
        }
    }
}

impl From<&ApiSettings> for ClientConfig {
    /// A static auth token becomes a bearer `Authorization` header and an API
    /// key becomes `X-API-Key`.
    fn from(settings: &ApiSettings) -> Self {
        let mut config = ClientConfig::new(settings.base_url.clone())
            .with_timeout_ms(settings.timeout_ms);

        if let Some(token) = settings.auth_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_default_header("Authorization", format!("Bearer {}", token));
        }
        if let Some(key) = settings.api_key.as_deref().filter(|k| !k.is_empty()) {
            config = config.with_default_header("X-API-Key", key);
        }
        config
    }
}

impl From<&NifiSettings> for ClientConfig {
    fn from(settings: &NifiSettings) -> Self {
        ClientConfig::new(settings.base_url.clone()).with_timeout_ms(settings.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_ms, 30_000);
        assert!(config.default_headers.is_empty());
        assert!(config.base_url.starts_with("https://"));
    }

    #[test]
    fn test_from_api_settings_maps_credentials_to_headers() {
        let settings = ApiSettings {
            base_url: "http://localhost:9000".into(),
            timeout_ms: 1500,
            auth_token: Some("tok".into()),
            api_key: Some("key-1".into()),
            ..Default::default()
        };
        let config = ClientConfig::from(&settings);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.request_timeout_ms, 1500);
        assert_eq!(config.default_headers["Authorization"], "Bearer tok");
        assert_eq!(config.default_headers["X-API-Key"], "key-1");
    }

    #[test]
    fn test_from_api_settings_skips_empty_credentials() {
        let settings = ApiSettings {
            auth_token: Some(String::new()),
            ..Default::default()
        };
        assert!(ClientConfig::from(&settings).default_headers.is_empty());
    }
}
