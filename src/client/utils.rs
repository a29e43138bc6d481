//! Small helpers shared by the client layers.

use serde::de::DeserializeOwned;

/// Join a base URL and a request path with exactly one `/` between them.
///
/// # Examples
///
/// ```
/// use nifi_api_harness::client::join_url;
///
/// assert_eq!(join_url("http://h/nifi-api/", "/access/token"), "http://h/nifi-api/access/token");
/// assert_eq!(join_url("http://h", "posts/1"), "http://h/posts/1");
/// assert_eq!(join_url("http://h/", ""), "http://h");
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Check if status code is in the 2xx range
pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Check if status code indicates access denied
pub fn is_access_denied_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Deserialize a response body.
///
/// Returns `None` for an empty body and for a body that does not decode as
/// `T`; the two cases are deliberately indistinguishable here.
pub fn deserialize_body<T: DeserializeOwned>(content: &str) -> Option<T> {
    if content.is_empty() {
        return None;
    }
    match serde_json::from_str(content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "response body did not deserialize");
            None
        }
    }
}
