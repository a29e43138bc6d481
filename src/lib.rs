#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(test, deny(missing_docs))]

//! # NiFi API harness
//!
//! An HTTP-level test harness for REST APIs, with a domain client for the
//! Apache NiFi flow-management API and models for the JSONPlaceholder CRUD
//! API.
//!
//! ## Layers
//!
//! 1. **Transport** - executes one request against a base URL and returns a
//!    measured [`ApiResponse`]. Non-success statuses are data, not errors
//! 2. **Generic client** - [`ApiClient`] verbs in raw and typed forms
//! 3. **Domain client** - [`NifiClient`] with bearer-token authentication,
//!    listing, processor run-state changes and queue inspection
//! 4. **Assertions** - [`ResponseAssertions`] checks that fail with a
//!    diagnostic [`AssertionError`]
//!
//! ## Client Usage
//!
//! ```ignore
//! use nifi_api_harness::{HarnessConfig, NifiClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HarnessConfig::load()?;
//!     let _guard = nifi_api_harness::logging::init(&config.logging)?;
//!
//!     let mut nifi = NifiClient::new(&config.nifi)?;
//!     if !nifi.authenticate().await {
//!         anyhow::bail!("authentication failed");
//!     }
//!
//!     for processor in nifi.list_processors("root").await {
//!         println!("{} {:?}", processor.id, processor.state());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - request descriptions and response envelopes
//! - **[error]** - error types and result handling
//! - **[client]** - transport and generic verb client
//! - **[nifi]** - NiFi domain client and resource models
//! - **[placeholder]** - JSONPlaceholder resource models
//! - **[assertions]** - response assertions
//! - **[config]** - layered configuration
//! - **[logging]** - tracing subscriber setup
//! - **[test_data]** - random data and JSON fixture helpers
//! - **[world]** - scenario steps over the NiFi client

pub mod assertions;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod nifi;
pub mod placeholder;
pub mod test_data;
pub mod types;
pub mod world;

pub use assertions::{AssertionError, ResponseAssertions};
pub use client::{ApiClient, ClientConfig};
pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use nifi::NifiClient;
pub use placeholder::{Post, User};
pub use types::{ApiRequest, ApiResponse, Headers};
