//! Genome records, query filters, and aggregate summaries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dataset::DatasetUuid;
use super::status::DatasetStatus;

/// Unique identifier for a genome in the metadata service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenomeUuid(pub Uuid);

impl std::fmt::Display for GenomeUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display only first 8 characters for readability in logs
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl From<Uuid> for GenomeUuid {
    fn from(uuid: Uuid) -> Self {
        GenomeUuid(uuid)
    }
}

impl std::ops::Deref for GenomeUuid {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A genome record as returned by the metadata service.
///
/// Transient, engine-owned payload: it exists for one pipeline step and is
/// re-read from dataflow by the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub genome_uuid: GenomeUuid,
    /// Production species name (e.g. "homo_sapiens").
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    /// Datasets attached to this genome; may be empty.
    #[serde(default)]
    pub datasets: Vec<DatasetUuid>,
}

/// Filter parameters for the metadata service's genome query.
///
/// All fields are optional; an empty filter matches everything the service
/// is willing to return. List-shaped fields are empty when unset so the
/// query-pair marshaling stays uniform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeFilter {
    #[serde(default)]
    pub genome_uuid: Vec<GenomeUuid>,
    #[serde(default)]
    pub dataset_uuid: Vec<DatasetUuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    #[serde(default)]
    pub dataset_status: Vec<DatasetStatus>,
    #[serde(default)]
    pub division: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organism_group_type: Option<String>,
    #[serde(default)]
    pub species: Vec<String>,
    /// Species to exclude from the result set.
    #[serde(default)]
    pub antispecies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    /// When set, the service advances each matched dataset to this status
    /// as part of the fetch. Status validation is owned by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_dataset_status: Option<DatasetStatus>,
}

/// Identifiers grouped under one species in the aggregate summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeIds {
    pub genome_uuid: GenomeUuid,
    #[serde(default)]
    pub datasets: Vec<DatasetUuid>,
}

/// Aggregate payload emitted once per genome-lister run.
///
/// Downstream funnel steps consume the species list as a whole; `all_info`
/// keys the identifiers by species name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeSummary {
    pub species: Vec<String>,
    pub all_info: HashMap<String, GenomeIds>,
}
