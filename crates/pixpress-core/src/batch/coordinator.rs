use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{PixpressError, Result};
use crate::intake;
use crate::record::{ProcessedOutput, RecordId};
use crate::remote::RemoteService;
use crate::settings::SharedSettings;
use crate::store::RecordStore;

use super::observer::BatchObserver;

/// Aggregate outcome of a batch. The batch itself always completes; these
/// counts are the only failure signal it produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// How a single `process` call settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Transform succeeded; the record is done.
    Processed,
    /// Transform failed; the record carries the reason.
    Failed,
    /// The record was already in flight; no second call was issued.
    AlreadyProcessing,
}

/// Orchestrates transforms against the shared record store.
///
/// The store lives behind a mutex and every mutation happens between
/// suspension points while the lock is held, so records are never observed
/// in a torn state. The batch-in-progress flag is coordinator-level and
/// independent of record status: a batch that has settled nothing yet
/// already reports busy.
pub struct Coordinator {
    store: Arc<Mutex<RecordStore>>,
    service: Arc<dyn RemoteService>,
    batch_active: AtomicBool,
}

impl Coordinator {
    pub fn new(store: Arc<Mutex<RecordStore>>, service: Arc<dyn RemoteService>) -> Self {
        Self {
            store,
            service,
            batch_active: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<Mutex<RecordStore>> {
        &self.store
    }

    pub fn service(&self) -> &Arc<dyn RemoteService> {
        &self.service
    }

    pub fn batch_in_progress(&self) -> bool {
        self.batch_active.load(Ordering::SeqCst)
    }

    /// Screen and upload files, then admit the accepted ones as records.
    ///
    /// Files rejected client-side (unsupported type, empty) are reported
    /// through the observer and never sent; if nothing survives screening
    /// the server is not contacted at all. Server-side per-file rejections
    /// are likewise surfaced without discarding the accepted set.
    pub async fn upload(
        &self,
        paths: &[PathBuf],
        defaults: &SharedSettings,
        observer: &dyn BatchObserver,
    ) -> Result<Vec<RecordId>> {
        let (files, rejected) = intake::prepare_uploads(paths).await;
        for message in &rejected {
            observer.notice(message);
        }
        if files.is_empty() {
            return Err(PixpressError::NoValidFiles);
        }

        let outcome = self.service.upload(files).await?;
        for message in &outcome.errors {
            observer.notice(message);
        }

        let mut store = self.store.lock().await;
        Ok(intake::admit(&mut store, &outcome, defaults))
    }

    /// Transform one record.
    ///
    /// The record moves to `processing` before the remote call is issued; a
    /// call against a record already in flight is a successful no-op rather
    /// than a duplicate request. The request is built from the record's
    /// fields as they are *now*, not from any earlier snapshot. Remote
    /// failures are converted into record state and reported as a
    /// `Failed` outcome, never as an error.
    pub async fn process(&self, id: RecordId) -> Result<ProcessOutcome> {
        let request = {
            let mut store = self.store.lock().await;
            let record = store
                .get_mut(id)
                .ok_or(PixpressError::RecordNotFound(id))?;
            if record.is_processing() {
                debug!(filename = %record.source().filename, "Transform already in flight");
                return Ok(ProcessOutcome::AlreadyProcessing);
            }
            record.begin_processing();
            record.transform_request()
        };

        match self.service.transform(&request).await {
            Ok(response) if response.original_filename == request.filename => {
                info!(
                    filename = %request.filename,
                    processed = %response.processed_filename,
                    size_bytes = response.processed_size_bytes,
                    "Transform complete"
                );
                let mut store = self.store.lock().await;
                if let Some(record) = store.get_mut(id) {
                    record.complete(ProcessedOutput {
                        filename: response.processed_filename,
                        size_bytes: response.processed_size_bytes,
                    });
                }
                Ok(ProcessOutcome::Processed)
            }
            Ok(response) => {
                let reason = PixpressError::MismatchedResponse {
                    expected: request.filename.clone(),
                    got: response.original_filename,
                }
                .to_string();
                warn!(filename = %request.filename, %reason, "Transform rejected");
                self.fail_record(id, reason).await;
                Ok(ProcessOutcome::Failed)
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(filename = %request.filename, %reason, "Transform failed");
                self.fail_record(id, reason).await;
                Ok(ProcessOutcome::Failed)
            }
        }
    }

    async fn fail_record(&self, id: RecordId, reason: String) {
        let mut store = self.store.lock().await;
        if let Some(record) = store.get_mut(id) {
            record.fail(reason);
        }
    }

    /// Transform every record that is pending right now.
    ///
    /// The pending set is snapshotted at call time; records that turn
    /// pending while the batch runs belong to the next batch. All calls are
    /// launched together and the batch waits for every one to settle;
    /// one record's failure never aborts its siblings. The summary always
    /// adds up to the snapshot size; an empty snapshot is a safe no-op.
    pub async fn process_all(&self, observer: &dyn BatchObserver) -> BatchSummary {
        self.batch_active.store(true, Ordering::SeqCst);

        let snapshot: Vec<(RecordId, String)> = {
            let store = self.store.lock().await;
            store
                .records()
                .iter()
                .filter(|r| r.is_pending())
                .map(|r| (r.id(), r.source().filename.clone()))
                .collect()
        };

        if snapshot.is_empty() {
            self.batch_active.store(false, Ordering::SeqCst);
            debug!("No records pending");
            observer.notice("All images up to date.");
            return BatchSummary::default();
        }

        info!(count = snapshot.len(), "Processing batch");
        observer.batch_started(snapshot.len());

        let outcomes = join_all(
            snapshot
                .iter()
                .map(|(id, filename)| self.settle(*id, filename, observer)),
        )
        .await;

        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        let summary = BatchSummary {
            succeeded,
            failed: outcomes.len() - succeeded,
        };
        self.batch_active.store(false, Ordering::SeqCst);

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch complete"
        );
        observer.batch_finished(&summary);
        summary
    }

    async fn settle(&self, id: RecordId, filename: &str, observer: &dyn BatchObserver) -> bool {
        let succeeded = matches!(
            self.process(id).await,
            Ok(ProcessOutcome::Processed | ProcessOutcome::AlreadyProcessing)
        );
        observer.record_settled(filename, succeeded);
        succeeded
    }
}
