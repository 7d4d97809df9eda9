//! Pager -> Fetcher -> Validator -> Store
//!
//! Records are processed strictly one after another in listing order. A
//! failure on one page or record is logged and counted, never propagated:
//! [`Ingestor::run`] always walks every id the pager yields.

use crate::endpoints::Endpoints;
use crate::fetcher::Fetcher;
use crate::pager::{Pager, Termination};
use crate::store::UserStore;
use crate::transport::Transport;
use crate::validator::{validate, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Counters for one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub ids_seen: usize,
    pub inserted: usize,
    pub fetch_failures: usize,
    pub missing_phone: usize,
    pub invalid_phone_length: usize,
    pub store_failures: usize,
    pub termination: Termination,
}

impl IngestReport {
    fn start(run_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            started_at: now,
            finished_at: now,
            pages_fetched: 0,
            pages_failed: 0,
            ids_seen: 0,
            inserted: 0,
            fetch_failures: 0,
            missing_phone: 0,
            invalid_phone_length: 0,
            store_failures: 0,
            termination: Termination::Exhausted,
        }
    }

    pub fn validation_failures(&self) -> usize {
        self.missing_phone + self.invalid_phone_length
    }

    /// Ids that did not end up in the store
    pub fn skipped(&self) -> usize {
        self.fetch_failures + self.validation_failures() + self.store_failures
    }
}

pub struct Ingestor {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    fetcher: Fetcher,
    store: Arc<dyn UserStore>,
}

impl Ingestor {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        store: Arc<dyn UserStore>,
    ) -> Self {
        let fetcher = Fetcher::new(transport.clone(), endpoints.clone());
        Self {
            transport,
            endpoints,
            fetcher,
            store,
        }
    }

    /// Ingest every listed record. Each call starts pagination from scratch.
    pub async fn run(&self) -> IngestReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("ingest", %run_id, base_url = %self.endpoints.base());
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid) -> IngestReport {
        let mut report = IngestReport::start(run_id);
        let mut pager = Pager::new(self.transport.clone(), self.endpoints.clone());
        info!("Starting ingestion");

        while let Some(batch) = pager.next_batch().await {
            // The pager already logged the failure and will stop after it
            let Ok(batch) = batch else {
                continue;
            };

            for id in batch.ids {
                report.ids_seen += 1;
                self.ingest_one(id, &mut report).await;
            }
        }

        report.pages_fetched = pager.pages_fetched();
        report.pages_failed = pager.pages_failed();
        report.termination = pager.termination().unwrap_or(Termination::Exhausted);
        report.finished_at = Utc::now();

        info!(
            pages = report.pages_fetched,
            failed_pages = report.pages_failed,
            ids = report.ids_seen,
            inserted = report.inserted,
            skipped = report.skipped(),
            termination = ?report.termination,
            "Ingestion finished"
        );

        report
    }

    async fn ingest_one(&self, id: i64, report: &mut IngestReport) {
        let raw = match self.fetcher.fetch(id).await {
            Ok(raw) => raw,
            Err(err) => {
                report.fetch_failures += 1;
                warn!(user_id = id, error = %err, kind = err.kind(), "Skipping user: fetch failed");
                return;
            },
        };

        let raw_number = raw.number.clone();
        let user = match validate(raw) {
            Ok(user) => user,
            Err(err) => {
                match err {
                    ValidationError::MissingPhoneNumber => report.missing_phone += 1,
                    ValidationError::InvalidPhoneNumberLength { .. } => {
                        report.invalid_phone_length += 1
                    },
                }
                warn!(
                    user_id = id,
                    kind = err.kind(),
                    number = ?raw_number,
                    error = %err,
                    "Skipping user: valid US phone number required"
                );
                return;
            },
        };

        let (user_id, name, age) = (user.id(), user.name().to_string(), user.age());
        match self.store.insert(user).await {
            Ok(()) => {
                report.inserted += 1;
                info!(user_id, name = %name, age, "Inserted valid user");
            },
            Err(err) => {
                report.store_failures += 1;
                error!(user_id, error = %err, "Failed to store user, record lost");
            },
        }
    }
}
