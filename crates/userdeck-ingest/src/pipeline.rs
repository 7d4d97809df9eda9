//! Full run: ingest everything, then select
//!
//! Ingestion finishes completely before the selector reads the store, so the
//! store never sees interleaved reads and writes.

use crate::config::PipelineConfig;
use crate::ingestor::{IngestReport, Ingestor};
use crate::selector::Selector;
use crate::store::{open_store, UserStore};
use crate::transport::{HttpTransport, Transport};
use crate::validator::ValidatedUser;
use std::sync::Arc;
use tracing::info;
use userdeck_common::{Result, UserdeckError};

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: IngestReport,
    /// Final ordered selection, ready to render
    pub selected: Vec<ValidatedUser>,
}

/// Run against the configured service over HTTP with a fresh store
pub async fn run(config: &PipelineConfig) -> Result<RunOutcome> {
    let transport = HttpTransport::new(config.request_timeout)
        .map_err(|e| UserdeckError::config(format!("Failed to build HTTP client: {}", e)))?;
    let store = open_store(config.store)
        .map_err(|e| UserdeckError::storage(format!("Failed to open {} store: {}", config.store, e)))?;

    run_with(config, Arc::new(transport), store).await
}

/// Run with explicit collaborators
pub async fn run_with(
    config: &PipelineConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn UserStore>,
) -> Result<RunOutcome> {
    let endpoints = config.endpoints()?;
    info!(
        base_url = %endpoints.base(),
        store = %config.store,
        selection_size = config.selection_size,
        "Running pipeline"
    );

    let report = Ingestor::new(transport, endpoints, store.clone()).run().await;
    let selected = Selector::with_size(store, config.selection_size)
        .select()
        .await;

    Ok(RunOutcome { report, selected })
}
