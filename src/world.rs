//! Scenario state for NiFi flow-management checks.
//!
//! [`FlowWorld`] carries what one scenario has observed so far and exposes
//! given/when/then steps as methods. A step binding framework, or a plain
//! `#[tokio::test]`, drives it:
//!
//! ```no_run
//! use nifi_api_harness::world::FlowWorld;
//! use nifi_api_harness::{HarnessConfig, NifiClient};
//!
//! # async fn run() -> nifi_api_harness::Result<()> {
//! let config = HarnessConfig::load()?;
//! let mut world = FlowWorld::new(NifiClient::new(&config.nifi)?);
//! world.given_authenticated().await?;
//! world.when_list_process_groups("root").await;
//! world.when_get_first_process_group()?;
//! world.then_process_group_has_valid_name()?;
//! # Ok(())
//! # }
//! ```
//!
//! Steps that act on "the current" processor or connection do nothing when a
//! previous step found none; the warning is logged where it was found.

use crate::assertions::{ensure, AssertionError};
use crate::error::Result;
use crate::nifi::models::{Connection, ProcessGroup, Processor};
use crate::nifi::NifiClient;

/// Mutable state of one scenario.
pub struct FlowWorld {
    client: NifiClient,
    process_groups: Vec<ProcessGroup>,
    current_group: Option<ProcessGroup>,
    processors: Vec<Processor>,
    current_processor: Option<Processor>,
    connections: Vec<Connection>,
    current_connection: Option<Connection>,
    queue_count: u64,
    process_groups_listed: bool,
    processors_listed: bool,
    connections_listed: bool,
}

impl FlowWorld {
    /// Fresh scenario state around `client`.
    pub fn new(client: NifiClient) -> Self {
        FlowWorld {
            client,
            process_groups: Vec::new(),
            current_group: None,
            processors: Vec::new(),
            current_processor: None,
            connections: Vec::new(),
            current_connection: None,
            queue_count: 0,
            process_groups_listed: false,
            processors_listed: false,
            connections_listed: false,
        }
    }

    /// The NiFi client driving the scenario.
    pub fn client(&self) -> &NifiClient {
        &self.client
    }

    /// Process groups from the last listing.
    pub fn process_groups(&self) -> &[ProcessGroup] {
        &self.process_groups
    }

    /// Processors from the last listing.
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Processor selected by a given step.
    pub fn current_processor(&self) -> Option<&Processor> {
        self.current_processor.as_ref()
    }

    /// Connections from the last listing.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connection selected by a given or when step.
    pub fn current_connection(&self) -> Option<&Connection> {
        self.current_connection.as_ref()
    }

    /// Queue count from the last lookup, `0` before any.
    pub fn queue_count(&self) -> u64 {
        self.queue_count
    }

    // Process groups

    /// Authentication must succeed.
    pub async fn given_authenticated(&mut self) -> Result<()> {
        tracing::info!("authenticating with NiFi");
        let authenticated = self.client.authenticate().await;
        ensure(authenticated, || "Authentication should succeed".to_string())?;
        Ok(())
    }

    /// List child process groups of `parent_id`.
    pub async fn when_list_process_groups(&mut self, parent_id: &str) {
        self.process_groups = self.client.list_process_groups(parent_id).await;
        self.process_groups_listed = true;
    }

    /// At least one process group must have been listed.
    pub fn when_get_first_process_group(&mut self) -> Result<()> {
        self.current_group = self.process_groups.first().cloned();
        ensure(self.current_group.is_some(), || {
            "At least one process group should exist".to_string()
        })?;
        Ok(())
    }

    /// A process group listing step must have run.
    pub fn then_process_groups_listed(&self) -> Result<()> {
        ensure(self.process_groups_listed, || "Process groups were never listed".to_string())?;
        tracing::info!(count = self.process_groups.len(), "process groups listed");
        Ok(())
    }

    /// At least `min_count` process groups were listed.
    pub fn then_process_group_count_at_least(&self, min_count: usize) -> Result<()> {
        let count = self.process_groups.len();
        ensure(count >= min_count, || {
            format!("Expected at least {} process groups but found {}", min_count, count)
        })?;
        tracing::info!(count, min_count, "process group count checked");
        Ok(())
    }

    /// The current process group has a non-empty name.
    pub fn then_process_group_has_valid_name(&self) -> Result<()> {
        let group = self.current_group()?;
        let name = group.name().unwrap_or_default();
        ensure(!name.is_empty(), || {
            format!("Process group {} should have a name", group.id)
        })?;
        tracing::info!(name, "process group name");
        Ok(())
    }

    /// The current process group has a non-empty id.
    pub fn then_process_group_has_valid_id(&self) -> Result<()> {
        let group = self.current_group()?;
        ensure(!group.id.is_empty(), || "Process group should have an id".to_string())?;
        tracing::info!(id = %group.id, "process group id");
        Ok(())
    }

    // Processors

    /// Authenticate (best effort) and list processors in `group_id`.
    pub async fn when_list_processors(&mut self, group_id: &str) {
        self.client.authenticate().await;
        self.processors = self.client.list_processors(group_id).await;
        self.processors_listed = true;
    }

    /// Pick the first processor in `group_id` as the current one.
    pub async fn given_processor_in_group(&mut self, group_id: &str) {
        self.when_list_processors(group_id).await;
        self.current_processor = self.processors.first().cloned();
        if self.current_processor.is_none() {
            tracing::warn!(group_id, "no processors found in process group");
        }
    }

    /// Pick a running processor in `group_id`, or start the first one when
    /// none is running.
    pub async fn given_running_processor_in_group(&mut self, group_id: &str) {
        self.when_list_processors(group_id).await;
        self.current_processor = self
            .processors
            .iter()
            .find(|p| p.state() == Some("RUNNING"))
            .cloned();

        if self.current_processor.is_none() {
            self.current_processor = self.processors.first().cloned();
            match &self.current_processor {
                Some(processor) => {
                    self.client.start_processor(&processor.id, processor.version()).await;
                }
                None => tracing::warn!(group_id, "no processors found in process group"),
            }
        }
    }

    /// Starting the current processor must succeed.
    pub async fn when_start_processor(&mut self) -> Result<()> {
        if let Some(processor) = &self.current_processor {
            let started = self.client.start_processor(&processor.id, processor.version()).await;
            ensure(started, || format!("Starting processor {} should succeed", processor.id))?;
        }
        Ok(())
    }

    /// Stopping the current processor must succeed.
    pub async fn when_stop_processor(&mut self) -> Result<()> {
        if let Some(processor) = &self.current_processor {
            let stopped = self.client.stop_processor(&processor.id, processor.version()).await;
            ensure(stopped, || format!("Stopping processor {} should succeed", processor.id))?;
        }
        Ok(())
    }

    /// A processor listing step must have run.
    pub fn then_processors_listed(&self) -> Result<()> {
        ensure(self.processors_listed, || "Processors were never listed".to_string())?;
        tracing::info!(count = self.processors.len(), "processors listed");
        Ok(())
    }

    /// At least `min_count` processors were listed.
    pub fn then_processor_count_at_least(&self, min_count: usize) -> Result<()> {
        let count = self.processors.len();
        ensure(count >= min_count, || {
            format!("Expected at least {} processors but found {}", min_count, count)
        })?;
        tracing::info!(count, min_count, "processor count checked");
        Ok(())
    }

    /// Re-read the current processor and log its state.
    ///
    /// State transitions are asynchronous in NiFi, so `expected` is only
    /// logged next to the observed state. The processor must still exist.
    pub async fn then_processor_state_logged(&self, expected: &str) -> Result<()> {
        let Some(current) = &self.current_processor else {
            return Ok(());
        };
        let refreshed = self.client.get_processor(&current.id).await.ok_or_else(|| {
            AssertionError::new(format!("Processor {} should still exist", current.id))
        })?;
        if let Some(state) = refreshed.state() {
            tracing::info!(processor_id = %refreshed.id, state, expected, "processor state");
        }
        Ok(())
    }

    // Connections and queues

    /// Authenticate (best effort) and list connections in `group_id`.
    pub async fn when_list_connections(&mut self, group_id: &str) {
        self.client.authenticate().await;
        self.connections = self.client.list_connections(group_id).await;
        self.connections_listed = true;
    }

    /// Pick the first connection in `group_id` as the current one.
    pub async fn given_connection_in_group(&mut self, group_id: &str) {
        self.when_list_connections(group_id).await;
        self.current_connection = self.connections.first().cloned();
        if self.current_connection.is_none() {
            tracing::warn!(group_id, "no connections found in process group");
        }
    }

    /// At least one connection must have been listed.
    pub fn when_get_first_connection(&mut self) -> Result<()> {
        self.current_connection = self.connections.first().cloned();
        ensure(self.current_connection.is_some(), || {
            "At least one connection should exist".to_string()
        })?;
        Ok(())
    }

    /// Read the queue count of the current connection.
    pub async fn when_get_queue_count(&mut self) {
        if let Some(connection) = &self.current_connection {
            self.queue_count = self.client.get_queue_count(&connection.id).await;
            tracing::info!(count = self.queue_count, "queue count");
        }
    }

    /// A connection listing step must have run.
    pub fn then_connections_listed(&self) -> Result<()> {
        ensure(self.connections_listed, || "Connections were never listed".to_string())?;
        tracing::info!(count = self.connections.len(), "connections listed");
        Ok(())
    }

    /// The last queue count is at least `min_count`.
    pub fn then_queue_count_at_least(&self, min_count: u64) -> Result<()> {
        ensure(self.queue_count >= min_count, || {
            format!(
                "Expected queue count of at least {} but got {}",
                min_count, self.queue_count
            )
        })?;
        Ok(())
    }

    /// The current connection has a non-empty id.
    pub fn then_connection_has_valid_id(&self) -> Result<()> {
        let connection = self.connection()?;
        ensure(!connection.id.is_empty(), || "Connection should have an id".to_string())?;
        tracing::info!(id = %connection.id, "connection id");
        Ok(())
    }

    /// The current connection must name both a source and a destination.
    pub fn then_connection_has_endpoints(&self) -> Result<()> {
        let connection = self.connection()?;
        let component = connection.component.as_ref().ok_or_else(|| {
            AssertionError::new(format!("Connection {} should have a component", connection.id))
        })?;
        let source = component.source.as_ref().ok_or_else(|| {
            AssertionError::new(format!("Connection {} should have a source", connection.id))
        })?;
        let destination = component.destination.as_ref().ok_or_else(|| {
            AssertionError::new(format!("Connection {} should have a destination", connection.id))
        })?;
        tracing::info!(source = %source.name, destination = %destination.name, "connection endpoints");
        Ok(())
    }

    fn current_group(&self) -> std::result::Result<&ProcessGroup, AssertionError> {
        self.current_group
            .as_ref()
            .ok_or_else(|| AssertionError::new("No current process group"))
    }

    fn connection(&self) -> std::result::Result<&Connection, AssertionError> {
        self.current_connection
            .as_ref()
            .ok_or_else(|| AssertionError::new("No current connection"))
    }
}
