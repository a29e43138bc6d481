//! NiFi REST API client.
//!
//! Every read operation degrades to an empty list, `None` or `0` when the
//! server answers with a non-success status, an empty or unreadable body, or
//! when the request cannot be sent at all. Scenarios then fail on the content
//! they assert, not on plumbing.

use crate::client::{is_access_denied_status, ApiClient, ClientConfig};
use crate::config::NifiSettings;
use crate::error::Result;
use crate::nifi::models::{Connection, ProcessGroup, Processor, ProcessorState, ProcessorStateUpdate};
use crate::types::{ApiResponse, Headers};
use serde::de::DeserializeOwned;

/// Conventional id of the top-level process group.
pub const DEFAULT_GROUP: &str = "root";

const TOKEN_PATH: &str = "/access/token";

/// Username/password pair for the token endpoint.
#[derive(Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// Client for the NiFi flow-management API.
///
/// Holds at most one bearer token, acquired by [`authenticate`] and kept for
/// the lifetime of the instance.
///
/// [`authenticate`]: NifiClient::authenticate
#[derive(Clone)]
pub struct NifiClient {
    api: ApiClient,
    credentials: Option<Credentials>,
    auth_token: Option<String>,
    client_id: String,
}

impl NifiClient {
    /// Create a client from NiFi settings.
    pub fn new(settings: &NifiSettings) -> Result<Self> {
        let client = Self::with_config(
            ClientConfig::from(settings),
            &settings.username,
            &settings.password,
        )?;
        tracing::info!(base_url = %settings.base_url, "NiFi API client initialized");
        Ok(client)
    }

    /// Create a client from a client configuration and credentials.
    ///
    /// Authentication is only attempted when both username and password are
    /// non-empty.
    pub fn with_config(config: ClientConfig, username: &str, password: &str) -> Result<Self> {
        let credentials = if username.is_empty() || password.is_empty() {
            None
        } else {
            Some(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
        };

        Ok(NifiClient {
            api: ApiClient::new(config)?,
            credentials,
            auth_token: None,
            client_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Exchange the configured credentials for a bearer token.
    ///
    /// Returns `true` without sending anything when no credentials are
    /// configured. Otherwise returns `true` only for a 2xx answer with a
    /// non-empty body, which becomes the token verbatim. Failures, including
    /// transport faults, are reported as `false` and leave the token absent.
    pub async fn authenticate(&mut self) -> bool {
        let Some(credentials) = &self.credentials else {
            tracing::info!("no credentials configured, skipping authentication");
            return true;
        };

        tracing::info!(username = %credentials.username, "authenticating with NiFi");
        let payload = serde_json::json!({
            "username": credentials.username,
            "password": credentials.password,
        });

        match self.api.post(TOKEN_PATH, &payload, None).await {
            Ok(response) if response.is_success() && !response.is_empty() => {
                self.auth_token = Some(response.content().to_string());
                tracing::info!("authentication successful");
                true
            }
            Ok(response) => {
                tracing::warn!(
                    status = response.status(),
                    access_denied = is_access_denied_status(response.status()),
                    "authentication failed"
                );
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "error during authentication");
                false
            }
        }
    }

    /// Whether a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// The current bearer token, if any.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Client id sent with revisions of updates made through this instance.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// List child process groups of `parent_id`.
    pub async fn list_process_groups(&self, parent_id: &str) -> Vec<ProcessGroup> {
        tracing::info!(parent_id, "listing process groups");
        let path = format!("/process-groups/{}/process-groups", parent_id);
        self.list(&path, "processGroups").await
    }

    /// List processors in `group_id`.
    pub async fn list_processors(&self, group_id: &str) -> Vec<Processor> {
        tracing::info!(group_id, "listing processors");
        let path = format!("/process-groups/{}/processors", group_id);
        self.list(&path, "processors").await
    }

    /// List connections in `group_id`.
    pub async fn list_connections(&self, group_id: &str) -> Vec<Connection> {
        tracing::info!(group_id, "listing connections");
        let path = format!("/process-groups/{}/connections", group_id);
        self.list(&path, "connections").await
    }

    /// Fetch a processor.
    pub async fn get_processor(&self, processor_id: &str) -> Option<Processor> {
        tracing::info!(processor_id, "getting processor");
        self.get_entity(&format!("/processors/{}", processor_id)).await
    }

    /// Fetch a connection.
    pub async fn get_connection(&self, connection_id: &str) -> Option<Connection> {
        tracing::debug!(connection_id, "getting connection");
        self.get_entity(&format!("/connections/{}", connection_id)).await
    }

    /// Start a processor at the given revision version.
    pub async fn start_processor(&self, processor_id: &str, version: u64) -> bool {
        self.set_processor_state(processor_id, version, ProcessorState::Running).await
    }

    /// Stop a processor at the given revision version.
    pub async fn stop_processor(&self, processor_id: &str, version: u64) -> bool {
        self.set_processor_state(processor_id, version, ProcessorState::Stopped).await
    }

    /// Change a processor's run state.
    ///
    /// `version` must be the revision last read from the server; a stale one
    /// is rejected by NiFi and reported here as `false`.
    pub async fn set_processor_state(
        &self,
        processor_id: &str,
        version: u64,
        state: ProcessorState,
    ) -> bool {
        tracing::info!(processor_id, version, %state, "changing processor state");
        let payload = ProcessorStateUpdate::new(
            processor_id,
            version,
            Some(self.client_id.clone()),
            state,
        );
        let path = format!("/processors/{}", processor_id);

        match self.api.put(&path, &payload, self.auth_headers().as_ref()).await {
            Ok(response) => {
                let success = response.is_success();
                tracing::info!(
                    processor_id,
                    %state,
                    status = response.status(),
                    success,
                    "processor state change finished"
                );
                success
            }
            Err(e) => {
                tracing::warn!(processor_id, error = %e, "processor state change not sent");
                false
            }
        }
    }

    /// Number of flow files queued on a connection, `0` when unknown.
    pub async fn get_queue_count(&self, connection_id: &str) -> u64 {
        tracing::info!(connection_id, "getting queue count");
        match self.get_connection(connection_id).await {
            Some(connection) => match connection.snapshot() {
                Some(snapshot) => {
                    tracing::info!(connection_id, count = snapshot.flow_files_queued, "queue count");
                    snapshot.flow_files_queued
                }
                None => {
                    tracing::warn!(connection_id, "connection has no queue snapshot");
                    0
                }
            },
            None => {
                tracing::warn!(connection_id, "could not get queue count");
                0
            }
        }
    }

    /// The generic client underneath, for calls the domain client does not
    /// cover.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `Authorization` header for the held token.
    pub fn auth_headers(&self) -> Option<Headers> {
        self.auth_token.as_ref().map(|token| {
            let mut headers = Headers::new();
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
            headers
        })
    }

    async fn get(&self, path: &str) -> Option<ApiResponse> {
        match self.api.get(path, self.auth_headers().as_ref()).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(path, error = %e, "request not sent");
                None
            }
        }
    }

    async fn get_entity<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let response = self.get(path).await?;
        crate::client::deserialize_body(response.content())
    }

    async fn list<T: DeserializeOwned>(&self, path: &str, field: &str) -> Vec<T> {
        let Some(response) = self.get(path).await else {
            return Vec::new();
        };
        if !response.is_success() || response.is_empty() {
            tracing::warn!(path, status = response.status(), "failed to list {}", field);
            return Vec::new();
        }

        let items = extract_list(response.content(), field);
        tracing::info!(count = items.len(), "found {}", field);
        items
    }
}

/// Pull the array under `field` out of a JSON object body.
///
/// A missing field is an empty list. A body that is not an object, or an
/// array whose entries do not decode, is logged and also an empty list.
fn extract_list<T: DeserializeOwned>(content: &str, field: &str) -> Vec<T> {
    let mut document: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(field, error = %e, "list response is not JSON");
            return Vec::new();
        }
    };

    match document.get_mut(field).map(serde_json::Value::take) {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(items) => serde_json::from_value(items).unwrap_or_else(|e| {
            tracing::warn!(field, error = %e, "list entries did not decode");
            Vec::new()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nifi::models::Processor;

    #[test]
    fn test_credentials_required_in_pairs() {
        let config = ClientConfig::new("http://localhost:8080/nifi-api");
        let client = NifiClient::with_config(config.clone(), "admin", "").unwrap();
        assert!(client.credentials.is_none());
        let client = NifiClient::with_config(config, "admin", "secret").unwrap();
        assert!(client.credentials.is_some());
        assert!(!client.is_authenticated());
        assert!(client.auth_headers().is_none());
    }

    #[test]
    fn test_client_ids_are_per_instance() {
        let config = ClientConfig::new("http://localhost:8080/nifi-api");
        let a = NifiClient::with_config(config.clone(), "", "").unwrap();
        let b = NifiClient::with_config(config, "", "").unwrap();
        assert_ne!(a.client_id(), b.client_id());
    }

    #[test]
    fn test_extract_list() {
        let items: Vec<Processor> =
            extract_list(r#"{"processors": [{"id": "a"}, {"id": "b"}]}"#, "processors");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, "b");

        assert!(extract_list::<Processor>(r#"{"other": []}"#, "processors").is_empty());
        assert!(extract_list::<Processor>(r#"{"processors": null}"#, "processors").is_empty());
        assert!(extract_list::<Processor>("[]", "processors").is_empty());
        assert!(extract_list::<Processor>("not json", "processors").is_empty());
        assert!(extract_list::<Processor>(r#"{"processors": 3}"#, "processors").is_empty());
    }
}
