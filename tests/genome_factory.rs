use std::collections::HashMap;
use std::sync::Arc;

use genoflow::metadata::MetadataCall;
use genoflow::{
    AGGREGATE_BRANCH, DatasetStatus, DatasetUuid, GenoflowError, GenomeFactory, GenomeRecord,
    GenomeSummary, GenomeUuid, MemorySink, MockMetadataClient, PER_ITEM_BRANCH, Params,
    RunContext, execute,
};
use serde_json::{Value, json};
use uuid::Uuid;

fn context(params: Value) -> (RunContext, Arc<MemorySink>) {
    let map: HashMap<String, Value> = serde_json::from_value(params).expect("params object");
    let sink = Arc::new(MemorySink::new());
    let ctx = RunContext::new(Params::from_map(map), sink.clone());
    (ctx, sink)
}

fn genome(species: &str) -> GenomeRecord {
    GenomeRecord {
        genome_uuid: GenomeUuid(Uuid::new_v4()),
        species: species.to_string(),
        division: Some("EnsemblVertebrates".to_string()),
        datasets: vec![DatasetUuid(Uuid::new_v4())],
    }
}

#[test_log::test(tokio::test)]
async fn test_emits_one_event_per_genome_plus_aggregate() {
    let client = Arc::new(MockMetadataClient::new());
    let records = vec![genome("homo_sapiens"), genome("mus_musculus")];
    client.add_genomes_response(Ok(records.clone()));

    let (mut ctx, sink) = context(json!({
        "metadata_db_uri": "mysql://meta/ensembl_genome_metadata",
        "division": "EnsemblVertebrates",
    }));
    execute(&GenomeFactory::new(client.clone()), &mut ctx)
        .await
        .expect("runnable should succeed");

    // One fan event per record, payloads intact.
    let per_item = sink.on_branch(PER_ITEM_BRANCH);
    assert_eq!(per_item.len(), 2);
    for (event, record) in per_item.iter().zip(&records) {
        let emitted: GenomeRecord = serde_json::from_value(event.payload.clone()).unwrap();
        assert_eq!(&emitted, record);
    }

    // Exactly one funnel event carrying every species.
    let aggregate = sink.on_branch(AGGREGATE_BRANCH);
    assert_eq!(aggregate.len(), 1);
    let summary: GenomeSummary = serde_json::from_value(aggregate[0].payload.clone()).unwrap();
    assert_eq!(
        summary.species,
        vec!["homo_sapiens".to_string(), "mus_musculus".to_string()]
    );
    for record in &records {
        let ids = summary.all_info.get(&record.species).expect("species keyed");
        assert_eq!(ids.genome_uuid, record.genome_uuid);
        assert_eq!(ids.datasets, record.datasets);
    }

    assert_eq!(client.call_count(), 1);
}

#[test_log::test(tokio::test)]
async fn test_missing_metadata_uri_fails_before_external_call() {
    let client = Arc::new(MockMetadataClient::new());
    let (mut ctx, sink) = context(json!({ "species": "homo_sapiens" }));

    let err = execute(&GenomeFactory::new(client.clone()), &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, GenoflowError::MissingParam(name) if name == "metadata_db_uri"));
    assert_eq!(client.call_count(), 0);
    assert!(sink.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_status_filter_defaults_to_submitted() {
    let client = Arc::new(MockMetadataClient::new());
    client.add_genomes_response(Ok(vec![]));

    let (mut ctx, _sink) = context(json!({ "metadata_db_uri": "mysql://meta" }));
    execute(&GenomeFactory::new(client.clone()), &mut ctx)
        .await
        .unwrap();

    match &client.get_calls()[0] {
        MetadataCall::GetGenomes { filter, .. } => {
            assert_eq!(filter.dataset_status, vec![DatasetStatus::Submitted]);
        }
        other => panic!("Unexpected call recorded: {:?}", other),
    }
}

#[test_log::test(tokio::test)]
async fn test_explicit_status_filter_is_not_overridden() {
    let client = Arc::new(MockMetadataClient::new());
    client.add_genomes_response(Ok(vec![]));

    let (mut ctx, _sink) = context(json!({
        "metadata_db_uri": "mysql://meta",
        "dataset_status": ["Processed"],
    }));
    execute(&GenomeFactory::new(client.clone()), &mut ctx)
        .await
        .unwrap();

    match &client.get_calls()[0] {
        MetadataCall::GetGenomes { filter, .. } => {
            assert_eq!(filter.dataset_status, vec![DatasetStatus::Processed]);
        }
        other => panic!("Unexpected call recorded: {:?}", other),
    }
}

#[test_log::test(tokio::test)]
async fn test_scalar_filter_params_read_as_lists() {
    let client = Arc::new(MockMetadataClient::new());
    client.add_genomes_response(Ok(vec![]));

    let (mut ctx, _sink) = context(json!({
        "metadata_db_uri": "mysql://meta",
        "species": "danio_rerio",
        "antispecies": ["homo_sapiens"],
        "batch_size": 50,
    }));
    execute(&GenomeFactory::new(client.clone()), &mut ctx)
        .await
        .unwrap();

    match &client.get_calls()[0] {
        MetadataCall::GetGenomes {
            metadata_uri,
            filter,
        } => {
            assert_eq!(metadata_uri, "mysql://meta");
            assert_eq!(filter.species, vec!["danio_rerio".to_string()]);
            assert_eq!(filter.antispecies, vec!["homo_sapiens".to_string()]);
            assert_eq!(filter.batch_size, Some(50));
        }
        other => panic!("Unexpected call recorded: {:?}", other),
    }
}

#[test_log::test(tokio::test)]
async fn test_empty_result_still_emits_aggregate() {
    let client = Arc::new(MockMetadataClient::new());
    client.add_genomes_response(Ok(vec![]));

    let (mut ctx, sink) = context(json!({ "metadata_db_uri": "mysql://meta" }));
    execute(&GenomeFactory::new(client), &mut ctx).await.unwrap();

    assert!(sink.on_branch(PER_ITEM_BRANCH).is_empty());
    let aggregate = sink.on_branch(AGGREGATE_BRANCH);
    assert_eq!(aggregate.len(), 1);
    let summary: GenomeSummary = serde_json::from_value(aggregate[0].payload.clone()).unwrap();
    assert!(summary.species.is_empty());
    assert!(summary.all_info.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_service_failure_propagates_without_aggregate() {
    let client = Arc::new(MockMetadataClient::new());
    client.add_genomes_response(Err(GenoflowError::Other(anyhow::anyhow!(
        "metadata service unavailable"
    ))));

    let (mut ctx, sink) = context(json!({ "metadata_db_uri": "mysql://meta" }));
    let result = execute(&GenomeFactory::new(client.clone()), &mut ctx).await;

    assert!(result.is_err());
    assert_eq!(client.call_count(), 1);
    assert!(sink.is_empty());
}
