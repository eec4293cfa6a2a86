//! Dataset descriptors as they travel through pipeline parameters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::genome::GenomeUuid;
use super::status::DatasetStatus;

/// Unique identifier for a dataset in the metadata service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetUuid(pub Uuid);

impl std::fmt::Display for DatasetUuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display only first 8 characters for readability in logs
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl From<Uuid> for DatasetUuid {
    fn from(uuid: Uuid) -> Self {
        DatasetUuid(uuid)
    }
}

impl std::ops::Deref for DatasetUuid {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// One dataset as described by upstream pipeline parameters.
///
/// Only the dataset UUID is mandatory; the rest is carried through for
/// downstream steps and logging. `dataset_status` holds the status the
/// dataset had before the current update round, `updated_dataset_status` the
/// status it reached in the most recent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub dataset_uuid: DatasetUuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genome_uuid: Option<GenomeUuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_status: Option<DatasetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_dataset_status: Option<DatasetStatus>,
}

/// Outcome of one `update_dataset_status` call against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub dataset_uuid: DatasetUuid,
    /// The status the service actually recorded.
    pub status: DatasetStatus,
}

/// Aggregate payload emitted once per dataset-updater run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub all_info: Vec<DatasetDescriptor>,
}
