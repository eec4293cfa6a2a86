//! Dataflow event emission.
//!
//! A runnable reports its results by emitting structured events onto
//! numbered output branches of the current pipeline step. The host engine
//! owns delivery and wiring; this module only defines the event shape and
//! the sink seam the engine implements.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Branch receiving one event per record (the fan).
pub const PER_ITEM_BRANCH: u32 = 2;

/// Branch receiving the single aggregate event after the fan (the funnel).
pub const AGGREGATE_BRANCH: u32 = 3;

/// One structured event emitted to a numbered output branch.
#[derive(Debug, Clone, Serialize)]
pub struct DataflowEvent {
    pub branch: u32,
    pub payload: Value,
    pub emitted_at: DateTime<Utc>,
}

/// Sink for dataflow events.
///
/// Implemented by the host engine in production; [`MemorySink`] collects
/// events for tests and local runs.
pub trait DataflowSink: Send + Sync {
    fn emit(&self, event: DataflowEvent) -> Result<()>;
}

/// In-memory sink that records every emitted event.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<DataflowEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events emitted so far, in emission order.
    pub fn events(&self) -> Vec<DataflowEvent> {
        self.events.lock().clone()
    }

    /// Events emitted to one branch, in emission order.
    pub fn on_branch(&self, branch: u32) -> Vec<DataflowEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.branch == branch)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DataflowSink for MemorySink {
    fn emit(&self, event: DataflowEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}
