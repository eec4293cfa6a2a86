//! Runnable lifecycle seam.
//!
//! The host workflow engine drives each unit of work through three phases:
//! `fetch_input` (parameter defaulting), `run` (the work), `write_output`
//! (final emission). The engine owns scheduling, retry policy, and dataflow
//! delivery; [`execute`] is the minimal local driver for tests and
//! standalone runs, executing the phases sequentially and stopping at the
//! first error.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{Instrument, info_span};

use crate::dataflow::{DataflowEvent, DataflowSink};
use crate::error::Result;
use crate::params::Params;

pub mod dataset_factory;
pub mod genome_factory;

pub use dataset_factory::DatasetFactory;
pub use genome_factory::GenomeFactory;

/// Per-invocation state handed to a runnable: its parameters and the sink
/// its dataflow events go to.
pub struct RunContext {
    pub params: Params,
    sink: Arc<dyn DataflowSink>,
}

impl RunContext {
    pub fn new(params: Params, sink: Arc<dyn DataflowSink>) -> Self {
        Self { params, sink }
    }

    /// Emit a structured event to a numbered output branch.
    pub fn dataflow<T: Serialize>(&self, payload: &T, branch: u32) -> Result<()> {
        let event = DataflowEvent {
            branch,
            payload: serde_json::to_value(payload)?,
            emitted_at: Utc::now(),
        };
        self.sink.emit(event)
    }
}

/// A unit of work executed by the host pipeline engine.
#[async_trait]
pub trait Runnable: Send + Sync {
    /// Step name, used for spans and logs.
    fn name(&self) -> &'static str;

    /// Default parameters before the work runs.
    async fn fetch_input(&self, _ctx: &mut RunContext) -> Result<()> {
        Ok(())
    }

    /// Do the work.
    async fn run(&self, ctx: &mut RunContext) -> Result<()>;

    /// Final emission after the work.
    async fn write_output(&self, _ctx: &mut RunContext) -> Result<()> {
        Ok(())
    }
}

/// Drive a runnable through its lifecycle phases in order.
pub async fn execute<R: Runnable + ?Sized>(runnable: &R, ctx: &mut RunContext) -> Result<()> {
    let span = info_span!("runnable", name = runnable.name());
    async {
        runnable.fetch_input(ctx).await?;
        runnable.run(ctx).await?;
        runnable.write_output(ctx).await
    }
    .instrument(span)
    .await
}
