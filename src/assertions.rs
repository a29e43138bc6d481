//! Response assertions.
//!
//! [`ResponseAssertions`] adds checks to [`ApiResponse`] that fail with an
//! [`AssertionError`] carrying the actual status and body. Each check returns
//! the response again so checks chain with `?`:
//!
//! ```
//! use nifi_api_harness::{ApiResponse, ResponseAssertions};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), nifi_api_harness::AssertionError> {
//! let response = ApiResponse::new(
//!     200,
//!     r#"{"id": 1}"#,
//!     vec![("Content-Type".into(), "application/json; charset=utf-8".into())],
//!     Duration::from_millis(40),
//! );
//!
//! response
//!     .assert_status(200)?
//!     .assert_success()?
//!     .assert_content_not_empty()?
//!     .assert_content_type("application/json")?
//!     .assert_response_time(Duration::from_secs(5))?;
//! # Ok(())
//! # }
//! ```

use crate::types::ApiResponse;
use std::time::Duration;
use thiserror::Error;

/// Result of a single assertion.
pub type AssertResult<'a> = std::result::Result<&'a ApiResponse, AssertionError>;

/// A failed expectation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    /// Create an assertion failure with a diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        AssertionError {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Fail with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), AssertionError> {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::new(message()))
    }
}

/// Assertions over a response envelope.
pub trait ResponseAssertions {
    /// Status code equals `expected`.
    fn assert_status(&self, expected: u16) -> AssertResult<'_>;

    /// Status code is 2xx.
    fn assert_success(&self) -> AssertResult<'_>;

    /// Success flag equals `expected`.
    fn assert_success_flag(&self, expected: bool) -> AssertResult<'_>;

    /// A header named `name` exists, compared case-insensitively.
    fn assert_header_exists(&self, name: &str) -> AssertResult<'_>;

    /// The first header named `name` has exactly `expected` as value.
    fn assert_header_value(&self, name: &str, expected: &str) -> AssertResult<'_>;

    /// Body is not empty.
    fn assert_content_not_empty(&self) -> AssertResult<'_>;

    /// Content type contains `expected`.
    fn assert_content_type(&self, expected: &str) -> AssertResult<'_>;

    /// The exchange took no longer than `max`.
    fn assert_response_time(&self, max: Duration) -> AssertResult<'_>;
}

impl ResponseAssertions for ApiResponse {
    fn assert_status(&self, expected: u16) -> AssertResult<'_> {
        ensure(self.status() == expected, || {
            format!(
                "Expected status code {} but got {}. Response: {}",
                expected,
                self.status(),
                self.content()
            )
        })?;
        Ok(self)
    }

    fn assert_success(&self) -> AssertResult<'_> {
        self.assert_success_flag(true)
    }

    fn assert_success_flag(&self, expected: bool) -> AssertResult<'_> {
        ensure(self.is_success() == expected, || {
            let wanted = if expected { "successful" } else { "unsuccessful" };
            format!(
                "Expected {} response but got {}. Response: {}",
                wanted,
                self.status(),
                self.content()
            )
        })?;
        Ok(self)
    }

    fn assert_header_exists(&self, name: &str) -> AssertResult<'_> {
        ensure(self.header(name).is_some(), || {
            format!("Expected header '{}' to exist in response (status {})", name, self.status())
        })?;
        Ok(self)
    }

    fn assert_header_value(&self, name: &str, expected: &str) -> AssertResult<'_> {
        let actual = self.header(name).ok_or_else(|| {
            AssertionError::new(format!("Expected header '{}' to exist in response", name))
        })?;
        ensure(actual == expected, || {
            format!(
                "Expected header '{}' to have value '{}' but got '{}'",
                name, expected, actual
            )
        })?;
        Ok(self)
    }

    fn assert_content_not_empty(&self) -> AssertResult<'_> {
        ensure(!self.is_empty(), || {
            format!(
                "Expected response content to be not empty (status {})",
                self.status()
            )
        })?;
        Ok(self)
    }

    fn assert_content_type(&self, expected: &str) -> AssertResult<'_> {
        let actual = self.content_type().unwrap_or_default();
        ensure(actual.contains(expected), || {
            format!(
                "Expected content type to contain '{}' but got '{}'",
                expected, actual
            )
        })?;
        Ok(self)
    }

    fn assert_response_time(&self, max: Duration) -> AssertResult<'_> {
        ensure(self.elapsed() <= max, || {
            format!(
                "Expected response within {} ms but it took {} ms (status {})",
                max.as_millis(),
                self.elapsed().as_millis(),
                self.status()
            )
        })?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content: &str) -> ApiResponse {
        ApiResponse::new(
            status,
            content,
            vec![
                ("content-type".into(), "application/json; charset=utf-8".into()),
                ("ETag".into(), "W/\"abc\"".into()),
            ],
            Duration::from_millis(250),
        )
    }

    #[test]
    fn test_status_match_and_message() {
        let resp = response(404, "{}");
        assert!(resp.assert_status(404).is_ok());

        let err = resp.assert_status(200).unwrap_err();
        assert!(err.message().contains("Expected status code 200 but got 404"));
        assert!(err.message().contains("Response: {}"));
    }

    #[test]
    fn test_success_flag() {
        assert!(response(201, "x").assert_success().is_ok());
        assert!(response(500, "x").assert_success().is_err());
        assert!(response(500, "x").assert_success_flag(false).is_ok());
        assert!(response(204, "").assert_success_flag(false).is_err());
    }

    #[test]
    fn test_headers() {
        let resp = response(200, "x");
        assert!(resp.assert_header_exists("etag").is_ok());
        assert!(resp.assert_header_exists("Location").is_err());
        assert!(resp.assert_header_value("ETAG", "W/\"abc\"").is_ok());

        let err = resp.assert_header_value("etag", "other").unwrap_err();
        assert!(err.message().contains("but got 'W/\"abc\"'"));
        assert!(resp.assert_header_value("Location", "/x").is_err());
    }

    #[test]
    fn test_content_checks() {
        assert!(response(200, "x").assert_content_not_empty().is_ok());
        assert!(response(200, "").assert_content_not_empty().is_err());
        assert!(response(200, "x").assert_content_type("application/json").is_ok());
        assert!(response(200, "x").assert_content_type("text/html").is_err());

        let bare = ApiResponse::new(200, "x", Vec::new(), Duration::ZERO);
        assert!(bare.assert_content_type("application/json").is_err());
    }

    #[test]
    fn test_response_time_uses_measured_duration() {
        let resp = response(200, "x");
        assert!(resp.assert_response_time(Duration::from_millis(250)).is_ok());
        let err = resp.assert_response_time(Duration::from_millis(100)).unwrap_err();
        assert!(err.message().contains("took 250 ms"));
    }

    #[test]
    fn test_chaining() {
        let resp = response(200, "{}");
        let chained = resp
            .assert_status(200)
            .and_then(|r| r.assert_success())
            .and_then(|r| r.assert_content_type("json"));
        assert!(chained.is_ok());
    }
}
