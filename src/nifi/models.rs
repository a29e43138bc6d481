//! NiFi flow-management resources as returned by the REST API.
//!
//! Every field defaults when it is missing from the payload, so partially
//! populated entities from older or newer NiFi versions still decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Optimistic-concurrency revision attached to a mutable component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Revision {
    /// Version last observed from the server
    pub version: u64,
    /// Client that made the last change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Canvas position of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// A processor entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Processor {
    /// Processor id
    pub id: String,
    /// Resource URI
    pub uri: String,
    /// Owning process group
    pub parent_group_id: String,
    /// Canvas position
    pub position: Option<Position>,
    /// User-facing attributes
    pub component: Option<ProcessorComponent>,
    /// Runtime metrics
    pub status: Option<ProcessorStatus>,
    /// Revision for updates
    pub revision: Option<Revision>,
}

impl Processor {
    /// Revision version, `0` when the entity carries none.
    pub fn version(&self) -> u64 {
        self.revision.as_ref().map_or(0, |r| r.version)
    }

    /// Configured state (`RUNNING`, `STOPPED`, `DISABLED`, ...), if known.
    pub fn state(&self) -> Option<&str> {
        self.component.as_ref().map(|c| c.state.as_str())
    }

    /// Display name, if known.
    pub fn name(&self) -> Option<&str> {
        self.component.as_ref().map(|c| c.name.as_str())
    }
}

/// Configurable part of a processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorComponent {
    /// Processor id
    pub id: String,
    /// Display name
    pub name: String,
    /// Fully qualified processor type
    #[serde(rename = "type")]
    pub kind: String,
    /// Configured state, e.g. `RUNNING`
    pub state: String,
    /// Scheduling and properties
    pub config: Option<ProcessorConfig>,
}

/// Scheduling and property configuration of a processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorConfig {
    /// Run schedule, e.g. `1 sec`
    pub scheduling_period: String,
    /// `TIMER_DRIVEN`, `CRON_DRIVEN`, ...
    pub scheduling_strategy: String,
    /// Concurrent tasks
    pub concurrently_schedulable_task_count: u32,
    /// Property values; unset properties are `None`
    pub properties: Option<BTreeMap<String, Option<String>>>,
}

/// Runtime status of a processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorStatus {
    /// Processor id
    pub id: String,
    /// Display name
    pub name: String,
    /// Runtime status, e.g. `Stopped`
    pub run_status: String,
    /// Time of the last statistics refresh
    pub stats_last_refreshed: String,
    /// Counters across the cluster
    pub aggregate_snapshot: Option<ProcessorSnapshot>,
}

/// Processor counters over the last statistics window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessorSnapshot {
    /// Bytes read
    pub bytes_in: u64,
    /// Bytes written
    pub bytes_out: u64,
    /// Flow files received
    pub flow_files_in: u64,
    /// Flow files sent
    pub flow_files_out: u64,
    /// Threads currently running
    pub active_thread_count: u32,
    /// Completed tasks
    pub task_count: u64,
}

/// A process group entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessGroup {
    /// Group id
    pub id: String,
    /// Resource URI
    pub uri: String,
    /// Parent group
    pub parent_group_id: String,
    /// Canvas position
    pub position: Option<Position>,
    /// User-facing attributes
    pub component: Option<ProcessGroupComponent>,
    /// Runtime metrics
    pub status: Option<ProcessGroupStatus>,
    /// Revision for updates
    pub revision: Option<Revision>,
}

impl ProcessGroup {
    /// Display name, if known.
    pub fn name(&self) -> Option<&str> {
        self.component.as_ref().map(|c| c.name.as_str())
    }
}

/// Configurable part of a process group, with component counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessGroupComponent {
    /// Group id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form comments
    pub comments: String,
    /// Running components
    pub running_count: u32,
    /// Stopped components
    pub stopped_count: u32,
    /// Invalid components
    pub invalid_count: u32,
    /// Disabled components
    pub disabled_count: u32,
}

/// Runtime status of a process group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessGroupStatus {
    /// Group id
    pub id: String,
    /// Display name
    pub name: String,
    /// Time of the last statistics refresh
    pub stats_last_refreshed: String,
    /// Counters across the cluster
    pub aggregate_snapshot: Option<GroupSnapshot>,
}

/// Aggregate counters for everything inside a process group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupSnapshot {
    /// Bytes received
    pub bytes_in: u64,
    /// Bytes sent
    pub bytes_out: u64,
    /// Flow files received
    pub flow_files_in: u64,
    /// Flow files sent
    pub flow_files_out: u64,
    /// Flow files waiting in queues
    pub flow_files_queued: u64,
    /// Bytes waiting in queues
    pub bytes_queued: u64,
}

/// A connection (queue) entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connection {
    /// Connection id
    pub id: String,
    /// Resource URI
    pub uri: String,
    /// Owning process group
    pub parent_group_id: String,
    /// User-facing attributes
    pub component: Option<ConnectionComponent>,
    /// Queue metrics
    pub status: Option<ConnectionStatus>,
    /// Revision for updates
    pub revision: Option<Revision>,
}

impl Connection {
    /// The aggregate queue snapshot, when the status chain is populated.
    pub fn snapshot(&self) -> Option<&QueueSnapshot> {
        self.status.as_ref()?.aggregate_snapshot.as_ref()
    }
}

/// Configurable part of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionComponent {
    /// Connection id
    pub id: String,
    /// Display name, often empty
    pub name: String,
    /// Upstream component
    pub source: Option<Connectable>,
    /// Downstream component
    pub destination: Option<Connectable>,
    /// Relationships routed into this queue
    pub selected_relationships: Option<Vec<String>>,
    /// Back pressure size limit, e.g. `1 GB`
    pub back_pressure_data_size_threshold: String,
    /// Back pressure flow file limit
    pub back_pressure_object_threshold: u64,
}

/// One end of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connectable {
    /// Component id
    pub id: String,
    /// Display name
    pub name: String,
    /// `PROCESSOR`, `INPUT_PORT`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Owning process group
    pub group_id: String,
}

/// Runtime status of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionStatus {
    /// Connection id
    pub id: String,
    /// Display name
    pub name: String,
    /// Queue counters across the cluster
    pub aggregate_snapshot: Option<QueueSnapshot>,
}

/// Point-in-time queue counters of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueSnapshot {
    /// Flow files enqueued
    pub flow_files_in: u64,
    /// Flow files dequeued
    pub flow_files_out: u64,
    /// Flow files currently queued
    pub flow_files_queued: u64,
    /// Bytes enqueued
    pub bytes_in: u64,
    /// Bytes dequeued
    pub bytes_out: u64,
    /// Bytes currently queued
    pub bytes_queued: u64,
    /// Human-readable queued size
    pub queued_size: String,
    /// Human-readable queued count
    pub queued_count: String,
}

/// Target run state of a processor update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorState {
    /// Scheduled to run
    Running,
    /// Not scheduled
    Stopped,
}

impl ProcessorState {
    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorState::Running => "RUNNING",
            ProcessorState::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `PUT /processors/{id}` for a run-state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessorStateUpdate {
    /// Revision the change is based on
    pub revision: Revision,
    /// Target id and state
    pub component: StateComponent,
}

/// Component part of a run-state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateComponent {
    /// Processor id
    pub id: String,
    /// Requested run state
    pub state: ProcessorState,
}

impl ProcessorStateUpdate {
    /// Build the payload. The revision is taken as given; it is never
    /// refreshed from the server here.
    pub fn new(
        processor_id: &str,
        version: u64,
        client_id: Option<String>,
        state: ProcessorState,
    ) -> Self {
        ProcessorStateUpdate {
            revision: Revision { version, client_id },
            component: StateComponent {
                id: processor_id.to_string(),
                state,
            },
        }
    }
}
