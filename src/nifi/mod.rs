//! Apache NiFi flow-management client.
//!
//! Built on the generic [`ApiClient`](crate::client::ApiClient): adds the
//! token exchange, bearer header injection, and the process-group, processor
//! and connection operations used by the scenarios.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | [`NifiClient::authenticate`] | `POST /access/token` |
//! | [`NifiClient::list_process_groups`] | `GET /process-groups/{id}/process-groups` |
//! | [`NifiClient::list_processors`] | `GET /process-groups/{id}/processors` |
//! | [`NifiClient::list_connections`] | `GET /process-groups/{id}/connections` |
//! | [`NifiClient::get_processor`] | `GET /processors/{id}` |
//! | [`NifiClient::start_processor`] / [`NifiClient::stop_processor`] | `PUT /processors/{id}` |
//! | [`NifiClient::get_queue_count`] | `GET /connections/{id}` |

mod client;
pub mod models;

pub use client::{NifiClient, DEFAULT_GROUP};
pub use models::{
    Connection, ProcessGroup, Processor, ProcessorState, ProcessorStateUpdate, QueueSnapshot,
    Revision,
};
