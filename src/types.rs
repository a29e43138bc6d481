//! Request and response types shared by every client layer.
//!
//! [`ApiRequest`] describes one outgoing call relative to a client's base URL.
//! [`ApiResponse`] is the uniform envelope every call produces, whatever the
//! status code.

use crate::client::is_success_status;
use crate::error::Result;
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Request headers, name to value.
pub type Headers = BTreeMap<String, String>;

/// An outgoing request, relative to a client's base URL.
///
/// # Examples
///
/// ```
/// use nifi_api_harness::ApiRequest;
/// use reqwest::Method;
/// use serde_json::json;
///
/// let request = ApiRequest::new(Method::POST, "/posts")
///     .with_header("X-Trace", "abc")
///     .with_json_body(&json!({"title": "t"}))
///     .unwrap();
/// assert_eq!(request.path, "/posts");
/// assert!(request.body.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path appended to the base URL
    pub path: String,
    /// Headers attached verbatim
    pub headers: Headers,
    /// JSON body, already serialized to a value
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Add a single header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge a header map into the request. `None` and empty maps are a no-op.
    pub fn with_headers(mut self, headers: Option<&Headers>) -> Self {
        if let Some(headers) = headers {
            for (name, value) in headers {
                self.headers.insert(name.clone(), value.clone());
            }
        }
        self
    }

    /// Serialize `body` as the JSON payload of the request.
    pub fn with_json_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// The response envelope returned by every transport call.
///
/// Produced once by the transport and read-only afterwards. The success flag
/// is derived from the status code alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    content: String,
    content_type: Option<String>,
    headers: Vec<(String, String)>,
    elapsed: Duration,
}

impl ApiResponse {
    /// Build an envelope from its parts.
    ///
    /// The content type is taken from the first `Content-Type` header, if any.
    pub fn new(
        status: u16,
        content: impl Into<String>,
        headers: Vec<(String, String)>,
        elapsed: Duration,
    ) -> Self {
        let content_type = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.clone());

        ApiResponse {
            status,
            content: content.into(),
            content_type,
            headers,
            elapsed,
        }
    }

    /// Numeric status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// `true` when the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    /// Raw body text, possibly empty.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Value of the `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// All headers in the order the server sent them.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup. The first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Wall-clock time from sending the request to reading the full body.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
