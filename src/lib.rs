//! Pipeline runnables for genome-metadata orchestration.
//!
//! This crate provides 'runnables' that plug into a workflow engine's
//! `fetch_input` → `run` → `write_output` lifecycle. Each runnable reads its
//! parameters from the engine, delegates the real work to an external
//! genome-metadata service, and re-emits the results as dataflow events on
//! numbered output branches for downstream pipeline steps.
//!
//! Two runnables are provided: a genome lister that queries the service with
//! filter parameters, and a dataset updater that advances dataset statuses
//! along a fixed forward-only table.

pub mod dataflow;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod params;
pub mod runnable;

// Re-export commonly used types
pub use dataflow::{AGGREGATE_BRANCH, DataflowEvent, DataflowSink, MemorySink, PER_ITEM_BRANCH};
pub use domain::{
    DatasetDescriptor, DatasetStatus, DatasetUuid, GenomeFilter, GenomeIds, GenomeRecord,
    GenomeSummary, GenomeUuid, StatusUpdate, UpdateSummary,
};
pub use error::{GenoflowError, Result};
pub use metadata::{MetadataClient, MockMetadataClient, RestClientConfig, RestMetadataClient};
pub use params::Params;
pub use runnable::{DatasetFactory, GenomeFactory, RunContext, Runnable, execute};
