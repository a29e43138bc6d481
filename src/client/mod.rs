//! Generic HTTP client layers.
//!
//! The client is split in two layers that the domain clients build on:
//!
//! - **Transport** - joins paths onto the base URL, attaches headers and JSON
//!   bodies, measures each exchange and returns an [`ApiResponse`] whatever
//!   the status code
//! - **ApiClient** - GET/POST/PUT/DELETE/PATCH in a raw form and a
//!   deserialize-to-`T` form
//!
//! No retries, no pooling policy and no TLS customization are applied: one call
//! is one request.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── api       - ApiClient verb methods
//! ├── transport - request execution and response envelopes
//! ├── config    - client configuration
//! └── utils     - URL joining, status helpers, body decoding
//! ```
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use nifi_api_harness::client::{ApiClient, ClientConfig};
//!
//! let config = ClientConfig::new("http://localhost:8080/nifi-api")
//!     .with_timeout_ms(5_000)
//!     .with_default_header("Accept", "application/json");
//! let client = ApiClient::new(config).unwrap();
//! assert_eq!(client.config().request_timeout_ms, 5_000);
//! ```
//!
//! [`ApiResponse`]: crate::ApiResponse

mod api;
mod config;
mod transport;
mod utils;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use transport::Transport;
pub use utils::*;
