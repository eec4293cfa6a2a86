//! Genome lister runnable.
//!
//! Queries the metadata service for genomes matching the step's filter
//! parameters, fans each record out on the per-item branch, and funnels one
//! aggregate summary (species list plus per-species identifiers) for the
//! downstream step that works on the whole batch.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;

use crate::dataflow::{AGGREGATE_BRANCH, PER_ITEM_BRANCH};
use crate::domain::{DatasetStatus, GenomeFilter, GenomeIds, GenomeSummary};
use crate::error::Result;
use crate::metadata::MetadataClient;

use super::{RunContext, Runnable};

pub struct GenomeFactory<C> {
    client: Arc<C>,
}

impl<C> GenomeFactory<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: MetadataClient> Runnable for GenomeFactory<C> {
    fn name(&self) -> &'static str {
        "genome_factory"
    }

    async fn fetch_input(&self, ctx: &mut RunContext) -> Result<()> {
        // Newly submitted datasets are the default unit of work.
        if !ctx.params.is_defined("dataset_status") {
            ctx.params
                .set("dataset_status", vec![DatasetStatus::Submitted])?;
        }
        Ok(())
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<()> {
        let metadata_uri = ctx.params.required_str("metadata_db_uri")?;
        let filter = GenomeFilter {
            genome_uuid: ctx.params.get_list("genome_uuid")?,
            dataset_uuid: ctx.params.get_list("dataset_uuid")?,
            dataset_type: ctx.params.get_as("dataset_type")?,
            dataset_status: ctx.params.get_list("dataset_status")?,
            division: ctx.params.get_list("division")?,
            organism_group_type: ctx.params.get_as("organism_group_type")?,
            species: ctx.params.get_list("species")?,
            antispecies: ctx.params.get_list("antispecies")?,
            batch_size: ctx.params.get_as("batch_size")?,
            update_dataset_status: ctx.params.get_as("update_dataset_status")?,
        };

        let genomes = self.client.get_genomes(&metadata_uri, &filter).await?;

        let mut summary = GenomeSummary::default();
        for genome in &genomes {
            ctx.dataflow(genome, PER_ITEM_BRANCH)?;
            tracing::info!(
                genome_uuid = %genome.genome_uuid,
                species = %genome.species,
                "Found genome"
            );
            counter!("genoflow_genomes_emitted_total").increment(1);

            summary.species.push(genome.species.clone());
            summary.all_info.insert(
                genome.species.clone(),
                GenomeIds {
                    genome_uuid: genome.genome_uuid,
                    datasets: genome.datasets.clone(),
                },
            );
        }

        // The funnel fires exactly once per run, even for an empty batch.
        ctx.dataflow(&summary, AGGREGATE_BRANCH)?;
        Ok(())
    }
}
