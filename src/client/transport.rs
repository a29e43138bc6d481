//! HTTP transport wrapper.
//!
//! Turns an [`ApiRequest`] into a reqwest call against the configured base URL
//! and turns whatever comes back into an [`ApiResponse`]. Error statuses are
//! returned as data; only transport faults become errors.

use crate::client::config::ClientConfig;
use crate::client::utils::join_url;
use crate::error::{HarnessError, Result};
use crate::types::{ApiRequest, ApiResponse, Headers};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Executes requests relative to a fixed base URL.
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl Transport {
    /// Build a transport from configuration.
    ///
    /// The configured timeout is applied to the underlying client and covers
    /// every request.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("nifi-api-harness/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HarnessError::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Transport {
            client,
            config: Arc::new(config),
        })
    }

    /// Execute a request.
    ///
    /// Never fails on an HTTP status. Fails with [`HarnessError::Http`] when
    /// the request cannot be built or sent, or the body cannot be read.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = join_url(&self.config.base_url, &request.path);
        let headers = merge_headers(&self.config.default_headers, &request.headers)?;
        let mut req_builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        if self.config.enable_logging {
            tracing::debug!(method = %request.method, url = %url, "sending request");
        }

        let started = Instant::now();
        let response = req_builder.send().await
            .map_err(|e| HarnessError::Http(e.to_string()))?;

        let status = response.status().as_u16();

        let mut headers = Vec::with_capacity(response.headers().len());
        for (name, value) in response.headers() {
            if let Ok(val) = value.to_str() {
                headers.push((name.as_str().to_string(), val.to_string()));
            }
        }

        let content = response.text().await
            .map_err(|e| HarnessError::Http(e.to_string()))?;
        let elapsed = started.elapsed();

        if self.config.enable_logging {
            tracing::debug!(
                method = %request.method,
                url = %url,
                status,
                elapsed_ms = elapsed.as_millis() as u64,
                "received response"
            );
        }

        Ok(ApiResponse::new(status, content, headers, elapsed))
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Default headers overlaid with per-call headers.
///
/// Names compare case-insensitively; a per-call header replaces a default of
/// the same name instead of being sent next to it.
fn merge_headers(defaults: &Headers, per_call: &Headers) -> Result<HeaderMap> {
    let mut merged = HeaderMap::with_capacity(defaults.len() + per_call.len());
    for (name, value) in defaults.iter().chain(per_call.iter()) {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HarnessError::Http(format!("invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| HarnessError::Http(format!("invalid value for header '{}': {}", name, e)))?;
        merged.insert(header_name, header_value);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_joins_base_url_and_attaches_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/nifi-api/flow/about")
            .match_header("x-default", "d")
            .match_header("x-call", "c")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let config = ClientConfig::new(format!("{}/nifi-api/", server.url()))
            .with_default_header("X-Default", "d");
        let transport = Transport::new(config).unwrap();
        let request = ApiRequest::new(Method::GET, "/flow/about").with_header("X-Call", "c");

        let response = transport.execute(&request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.content(), r#"{"ok":true}"#);
        assert_eq!(response.content_type(), Some("application/json"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/posts")
            .match_header("content-type", Matcher::Regex("application/json".into()))
            .match_body(Matcher::Json(json!({"title": "t"})))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let transport = Transport::new(ClientConfig::new(server.url())).unwrap();
        let request = ApiRequest::new(Method::POST, "/posts")
            .with_json_body(&json!({"title": "t"}))
            .unwrap();

        let response = transport.execute(&request).await.unwrap();
        assert_eq!(response.status(), 201);
        assert!(response.is_success());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_data() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/posts/1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let transport = Transport::new(ClientConfig::new(server.url())).unwrap();
        let response = transport
            .execute(&ApiRequest::new(Method::DELETE, "/posts/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        assert!(!response.is_success());
        assert_eq!(response.content(), "boom");
    }

    #[tokio::test]
    async fn test_per_call_header_replaces_default() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flow/about")
            .match_header("authorization", Matcher::Regex("^Bearer call$".into()))
            .with_status(200)
            .create_async()
            .await;
        let _fallback = server
            .mock("GET", "/flow/about")
            .with_status(418)
            .create_async()
            .await;

        let config = ClientConfig::new(server.url())
            .with_default_header("Authorization", "Bearer default")
            .with_default_header("Accept", "application/json");
        let transport = Transport::new(config).unwrap();
        let request = ApiRequest::new(Method::GET, "/flow/about")
            .with_header("authorization", "Bearer call");

        let response = transport.execute(&request).await.unwrap();
        assert_eq!(response.status(), 200);
        mock.assert_async().await;
    }

    #[test]
    fn test_merge_headers_overrides_case_insensitively() {
        let mut defaults = Headers::new();
        defaults.insert("Authorization".into(), "Bearer default".into());
        defaults.insert("X-API-Key".into(), "k".into());
        let mut per_call = Headers::new();
        per_call.insert("AUTHORIZATION".into(), "Bearer call".into());

        let merged = merge_headers(&defaults, &per_call).unwrap();
        let values: Vec<_> = merged.get_all("authorization").iter().collect();
        assert_eq!(values, vec!["Bearer call"]);
        assert_eq!(merged.get("x-api-key").unwrap(), "k");
    }

    #[test]
    fn test_invalid_header_is_transport_error() {
        let mut per_call = Headers::new();
        per_call.insert("bad header".into(), "v".into());
        assert!(merge_headers(&Headers::new(), &per_call).unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = Transport::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let err = transport
            .execute(&ApiRequest::new(Method::GET, "/"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
