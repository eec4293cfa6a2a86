//! Dataset status updater runnable.
//!
//! Moves a batch of datasets to the status requested by the pipeline,
//! delegating the actual mutation (and its validation) to the metadata
//! service. Each updated descriptor fans out on the per-item branch; the
//! whole batch funnels once on the aggregate branch.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;

use crate::dataflow::{AGGREGATE_BRANCH, PER_ITEM_BRANCH};
use crate::domain::{DatasetDescriptor, DatasetStatus, UpdateSummary};
use crate::error::{GenoflowError, Result};
use crate::metadata::MetadataClient;
use crate::params::Params;

use super::{RunContext, Runnable};

pub struct DatasetFactory<C> {
    client: Arc<C>,
}

impl<C> DatasetFactory<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

/// Build the single-descriptor fallback from the step's scalar parameters.
///
/// Used when no upstream step provided an `all_info` list; only the dataset
/// UUID is required.
fn descriptor_from_scalars(params: &Params) -> Result<DatasetDescriptor> {
    Ok(DatasetDescriptor {
        dataset_uuid: params.required("dataset_uuid")?,
        genome_uuid: params.get_as("genome_uuid")?,
        species: params.get_as("species")?,
        dataset_type: params.get_as("dataset_type")?,
        dataset_source: params.get_as("dataset_source")?,
        dataset_status: params.get_as("dataset_status")?,
        updated_dataset_status: params.get_as("updated_dataset_status")?,
    })
}

#[async_trait]
impl<C: MetadataClient> Runnable for DatasetFactory<C> {
    fn name(&self) -> &'static str {
        "dataset_factory"
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<()> {
        let metadata_uri = ctx.params.required_str("metadata_db_uri")?;
        let target: DatasetStatus = ctx.params.required("update_dataset_status")?;

        let descriptors: Vec<DatasetDescriptor> = match ctx.params.get_as("all_info")? {
            Some(descriptors) => descriptors,
            None => vec![descriptor_from_scalars(&ctx.params)?],
        };

        let mut updated = Vec::with_capacity(descriptors.len());
        for mut descriptor in descriptors {
            // A descriptor already at the requested status advances one step
            // along the fixed table instead.
            let next_status = if descriptor.updated_dataset_status == Some(target) {
                target
                    .next()
                    .ok_or(GenoflowError::TransitionExhausted(target))?
            } else {
                target
            };

            let update = self
                .client
                .update_dataset_status(&metadata_uri, descriptor.dataset_uuid, next_status)
                .await?;

            tracing::info!(
                dataset_uuid = %descriptor.dataset_uuid,
                genome_uuid = ?descriptor.genome_uuid,
                status = %update.status,
                "Updated dataset status"
            );
            counter!("genoflow_datasets_updated_total").increment(1);

            // Roll the descriptor forward: the previous updated status
            // becomes the current one, the service's answer the new one.
            descriptor.dataset_status = descriptor
                .updated_dataset_status
                .or(descriptor.dataset_status);
            descriptor.updated_dataset_status = Some(update.status);

            ctx.dataflow(&descriptor, PER_ITEM_BRANCH)?;
            updated.push(descriptor);
        }

        ctx.dataflow(&UpdateSummary { all_info: updated }, AGGREGATE_BRANCH)?;
        Ok(())
    }
}
