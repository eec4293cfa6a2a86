//! Metadata-service client abstraction.
//!
//! This module defines the `MetadataClient` trait over the external
//! genome-metadata service's fixed call contract, enabling testability with
//! mock implementations. The service owns database access, status
//! validation, batching, and querying; the runnables only marshal parameters
//! in and events out.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{DatasetStatus, DatasetUuid, GenomeFilter, GenomeRecord, StatusUpdate};
use crate::error::{GenoflowError, Result};

/// Trait over the metadata service's call contract.
///
/// This abstraction allows for different implementations (production vs.
/// testing) and makes the runnables testable without a live service.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Query genome records matching the filter.
    ///
    /// When `filter.update_dataset_status` is set, the service advances each
    /// matched dataset to that status as part of the fetch.
    async fn get_genomes(
        &self,
        metadata_uri: &str,
        filter: &GenomeFilter,
    ) -> Result<Vec<GenomeRecord>>;

    /// Move one dataset to `status`.
    ///
    /// The service validates the transition; the returned [`StatusUpdate`]
    /// carries the status it actually recorded.
    async fn update_dataset_status(
        &self,
        metadata_uri: &str,
        dataset_uuid: DatasetUuid,
        status: DatasetStatus,
    ) -> Result<StatusUpdate>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Configuration for the REST client.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

/// Production metadata client talking REST to the service endpoint.
///
/// The endpoint is passed per call, mirroring how the pipelines hand the
/// metadata URI to each step as a parameter.
#[derive(Clone)]
pub struct RestMetadataClient {
    client: reqwest::Client,
    config: RestClientConfig,
}

impl RestMetadataClient {
    pub fn new() -> Self {
        Self::with_config(RestClientConfig::default())
    }

    pub fn with_config(config: RestClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }
}

impl Default for RestMetadataClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a filter into repeated query pairs.
///
/// List-shaped filters repeat the key (`species=a&species=b`); unset fields
/// are omitted entirely.
fn filter_query_pairs(filter: &GenomeFilter) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    for uuid in &filter.genome_uuid {
        pairs.push(("genome_uuid", uuid.0.to_string()));
    }
    for uuid in &filter.dataset_uuid {
        pairs.push(("dataset_uuid", uuid.0.to_string()));
    }
    if let Some(dataset_type) = &filter.dataset_type {
        pairs.push(("dataset_type", dataset_type.clone()));
    }
    for status in &filter.dataset_status {
        pairs.push(("dataset_status", status.as_str().to_string()));
    }
    for division in &filter.division {
        pairs.push(("division", division.clone()));
    }
    if let Some(group_type) = &filter.organism_group_type {
        pairs.push(("organism_group_type", group_type.clone()));
    }
    for species in &filter.species {
        pairs.push(("species", species.clone()));
    }
    for species in &filter.antispecies {
        pairs.push(("antispecies", species.clone()));
    }
    if let Some(batch_size) = filter.batch_size {
        pairs.push(("batch_size", batch_size.to_string()));
    }
    if let Some(status) = filter.update_dataset_status {
        pairs.push(("update_dataset_status", status.as_str().to_string()));
    }
    pairs
}

#[async_trait]
impl MetadataClient for RestMetadataClient {
    #[tracing::instrument(skip(self, filter), fields(metadata_uri = %metadata_uri))]
    async fn get_genomes(
        &self,
        metadata_uri: &str,
        filter: &GenomeFilter,
    ) -> Result<Vec<GenomeRecord>> {
        let url = format!("{}/genomes", metadata_uri.trim_end_matches('/'));
        let pairs = filter_query_pairs(filter);

        tracing::debug!(url = %url, filters = pairs.len(), "Querying genomes");

        let response = self
            .client
            .get(&url)
            .query(&pairs)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Genome query failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenoflowError::MetadataStatus {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let genomes: Vec<GenomeRecord> = response.json().await?;
        tracing::info!(count = genomes.len(), "Genome query completed");
        Ok(genomes)
    }

    #[tracing::instrument(skip(self), fields(metadata_uri = %metadata_uri, dataset_uuid = %dataset_uuid, status = %status))]
    async fn update_dataset_status(
        &self,
        metadata_uri: &str,
        dataset_uuid: DatasetUuid,
        status: DatasetStatus,
    ) -> Result<StatusUpdate> {
        let url = format!(
            "{}/datasets/{}/status",
            metadata_uri.trim_end_matches('/'),
            dataset_uuid.0
        );

        tracing::debug!(url = %url, "Updating dataset status");

        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "status": status }))
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Dataset status update failed");
                e
            })?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenoflowError::MetadataStatus {
                status: http_status.as_u16(),
                url,
                body,
            });
        }

        let update: StatusUpdate = response.json().await?;
        tracing::info!(recorded = %update.status, "Dataset status updated");
        Ok(update)
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::sync::Arc;

/// Record of a call made to the mock metadata client.
#[derive(Debug, Clone)]
pub enum MetadataCall {
    GetGenomes {
        metadata_uri: String,
        filter: GenomeFilter,
    },
    UpdateDatasetStatus {
        metadata_uri: String,
        dataset_uuid: DatasetUuid,
        status: DatasetStatus,
    },
}

/// Mock metadata client for testing.
///
/// Allows configuring predetermined responses without a live service.
/// Responses queue per operation and are consumed in FIFO order; an
/// unconfigured call returns an error.
#[derive(Clone, Default)]
pub struct MockMetadataClient {
    genome_responses: Arc<Mutex<Vec<Result<Vec<GenomeRecord>>>>>,
    update_responses: Arc<Mutex<Vec<Result<StatusUpdate>>>>,
    calls: Arc<Mutex<Vec<MetadataCall>>>,
}

impl MockMetadataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next `get_genomes` call.
    pub fn add_genomes_response(&self, response: Result<Vec<GenomeRecord>>) {
        self.genome_responses.lock().push(response);
    }

    /// Queue a response for the next `update_dataset_status` call.
    pub fn add_update_response(&self, response: Result<StatusUpdate>) {
        self.update_responses.lock().push(response);
    }

    /// Get all calls that have been made to this mock client.
    pub fn get_calls(&self) -> Vec<MetadataCall> {
        self.calls.lock().clone()
    }

    /// Clear all recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl MetadataClient for MockMetadataClient {
    async fn get_genomes(
        &self,
        metadata_uri: &str,
        filter: &GenomeFilter,
    ) -> Result<Vec<GenomeRecord>> {
        self.calls.lock().push(MetadataCall::GetGenomes {
            metadata_uri: metadata_uri.to_string(),
            filter: filter.clone(),
        });

        let mut responses = self.genome_responses.lock();
        if responses.is_empty() {
            return Err(GenoflowError::Other(anyhow::anyhow!(
                "No mock response configured for get_genomes"
            )));
        }
        responses.remove(0)
    }

    async fn update_dataset_status(
        &self,
        metadata_uri: &str,
        dataset_uuid: DatasetUuid,
        status: DatasetStatus,
    ) -> Result<StatusUpdate> {
        self.calls.lock().push(MetadataCall::UpdateDatasetStatus {
            metadata_uri: metadata_uri.to_string(),
            dataset_uuid,
            status,
        });

        let mut responses = self.update_responses.lock();
        if responses.is_empty() {
            return Err(GenoflowError::Other(anyhow::anyhow!(
                "No mock response configured for update_dataset_status for {}",
                dataset_uuid
            )));
        }
        responses.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GenomeUuid;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_mock_client_basic() {
        let mock = MockMetadataClient::new();
        let record = GenomeRecord {
            genome_uuid: GenomeUuid(Uuid::new_v4()),
            species: "homo_sapiens".to_string(),
            division: None,
            datasets: vec![],
        };
        mock.add_genomes_response(Ok(vec![record.clone()]));

        let filter = GenomeFilter {
            species: vec!["homo_sapiens".to_string()],
            ..Default::default()
        };
        let genomes = mock.get_genomes("mysql://meta", &filter).await.unwrap();
        assert_eq!(genomes, vec![record]);

        // Verify call was recorded
        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            MetadataCall::GetGenomes {
                metadata_uri,
                filter,
            } => {
                assert_eq!(metadata_uri, "mysql://meta");
                assert_eq!(filter.species, vec!["homo_sapiens".to_string()]);
            }
            other => panic!("Unexpected call recorded: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_client_fifo_order() {
        let mock = MockMetadataClient::new();
        let uuid = DatasetUuid(Uuid::new_v4());
        mock.add_update_response(Ok(StatusUpdate {
            dataset_uuid: uuid,
            status: DatasetStatus::Processing,
        }));
        mock.add_update_response(Ok(StatusUpdate {
            dataset_uuid: uuid,
            status: DatasetStatus::Processed,
        }));

        let first = mock
            .update_dataset_status("mysql://meta", uuid, DatasetStatus::Processing)
            .await
            .unwrap();
        assert_eq!(first.status, DatasetStatus::Processing);

        let second = mock
            .update_dataset_status("mysql://meta", uuid, DatasetStatus::Processed)
            .await
            .unwrap();
        assert_eq!(second.status, DatasetStatus::Processed);

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_client_no_response() {
        let mock = MockMetadataClient::new();
        let result = mock
            .get_genomes("mysql://meta", &GenomeFilter::default())
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_query_pairs_repeat_lists_and_skip_unset() {
        let filter = GenomeFilter {
            species: vec!["homo_sapiens".to_string(), "mus_musculus".to_string()],
            dataset_status: vec![DatasetStatus::Submitted],
            batch_size: Some(50),
            ..Default::default()
        };
        let pairs = filter_query_pairs(&filter);
        let species: Vec<_> = pairs
            .iter()
            .filter(|(k, _)| *k == "species")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(species, vec!["homo_sapiens", "mus_musculus"]);
        assert!(
            pairs
                .iter()
                .any(|(k, v)| *k == "dataset_status" && v == "Submitted")
        );
        assert!(pairs.iter().any(|(k, v)| *k == "batch_size" && v == "50"));
        assert!(!pairs.iter().any(|(k, _)| *k == "division"));
        assert!(!pairs.iter().any(|(k, _)| *k == "update_dataset_status"));
    }
}
