#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use pixpress_core::batch::{BatchObserver, BatchSummary, Coordinator};
use pixpress_core::error::{PixpressError, Result};
use pixpress_core::record::{RecordId, SourceInfo};
use pixpress_core::remote::{
    Archive, RemoteService, TransformRequest, TransformResponse, UploadFile, UploadOutcome,
    UploadedFileInfo,
};
use pixpress_core::settings::SharedSettings;
use pixpress_core::store::RecordStore;

/// In-memory stand-in for the transform server.
///
/// Failures, mismatched echoes, and upload rejections are programmable per
/// filename; `hold_transforms` parks transform calls on a semaphore so
/// tests can observe in-flight state deterministically.
pub struct FakeService {
    dims: StdMutex<HashMap<String, (u32, u32)>>,
    reject_uploads: StdMutex<HashSet<String>>,
    fail: StdMutex<HashSet<String>>,
    mismatch: StdMutex<HashSet<String>>,
    archive_error: AtomicBool,
    hold: AtomicBool,
    gate: Semaphore,
    transform_calls: StdMutex<Vec<String>>,
    archive_requests: StdMutex<Vec<Vec<String>>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            dims: StdMutex::default(),
            reject_uploads: StdMutex::default(),
            fail: StdMutex::default(),
            mismatch: StdMutex::default(),
            archive_error: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            gate: Semaphore::new(0),
            transform_calls: StdMutex::default(),
            archive_requests: StdMutex::default(),
        }
    }
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_dims(&self, filename: &str, width: u32, height: u32) {
        self.dims
            .lock()
            .unwrap()
            .insert(filename.to_string(), (width, height));
    }

    pub fn reject_upload(&self, filename: &str) {
        self.reject_uploads
            .lock()
            .unwrap()
            .insert(filename.to_string());
    }

    pub fn fail_on(&self, filename: &str) {
        self.fail.lock().unwrap().insert(filename.to_string());
    }

    pub fn clear_failure(&self, filename: &str) {
        self.fail.lock().unwrap().remove(filename);
    }

    pub fn mismatch_on(&self, filename: &str) {
        self.mismatch.lock().unwrap().insert(filename.to_string());
    }

    pub fn fail_archive(&self) {
        self.archive_error.store(true, Ordering::SeqCst);
    }

    /// Park subsequent transform calls until `release` grants permits.
    pub fn hold_transforms(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    pub fn transform_count(&self) -> usize {
        self.transform_calls.lock().unwrap().len()
    }

    pub fn transform_calls(&self) -> Vec<String> {
        self.transform_calls.lock().unwrap().clone()
    }

    pub fn archive_requests(&self) -> Vec<Vec<String>> {
        self.archive_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteService for FakeService {
    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadOutcome> {
        let mut outcome = UploadOutcome::default();
        for file in files {
            if self.reject_uploads.lock().unwrap().contains(&file.filename) {
                outcome
                    .errors
                    .push(format!("Cannot read image: {}", file.filename));
                continue;
            }
            let (width, height) = self
                .dims
                .lock()
                .unwrap()
                .get(&file.filename)
                .copied()
                .unwrap_or((640, 480));
            outcome.uploaded_files.push(UploadedFileInfo {
                original_filename: file.filename,
                width,
                height,
                format: "png".to_string(),
                size_bytes: file.bytes.len() as u64,
            });
        }
        Ok(outcome)
    }

    async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse> {
        self.transform_calls
            .lock()
            .unwrap()
            .push(request.filename.clone());
        if self.hold.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                // One release() permit unparks exactly one call.
                permit.forget();
            }
        }
        if self.fail.lock().unwrap().contains(&request.filename) {
            return Err(PixpressError::Api {
                status: 500,
                message: format!("Failed to process image: {}", request.filename),
            });
        }
        let echoed = if self.mismatch.lock().unwrap().contains(&request.filename) {
            "someone-else.png".to_string()
        } else {
            request.filename.clone()
        };
        Ok(TransformResponse {
            original_filename: echoed,
            processed_filename: format!("processed_{}", request.filename),
            processed_size_bytes: 12_345,
        })
    }

    async fn fetch_archive(&self, filenames: &[String]) -> Result<Archive> {
        self.archive_requests
            .lock()
            .unwrap()
            .push(filenames.to_vec());
        if self.archive_error.load(Ordering::SeqCst) {
            return Err(PixpressError::Api {
                status: 500,
                message: "Failed to create zip file.".to_string(),
            });
        }
        Ok(Archive {
            filename: "processed_images_batch.zip".to_string(),
            bytes: vec![b'P', b'K', 3, 4],
        })
    }

    async fn fetch_result(&self, filename: &str) -> Result<Vec<u8>> {
        if self.fail.lock().unwrap().contains(filename) {
            return Err(PixpressError::Api {
                status: 404,
                message: "File not found".to_string(),
            });
        }
        Ok(vec![1, 2, 3, 4])
    }
}

pub fn source(filename: &str, width: u32, height: u32) -> SourceInfo {
    SourceInfo {
        filename: filename.to_string(),
        width,
        height,
        size_bytes: 1024,
        format: "png".to_string(),
    }
}

/// Build a coordinator over a store seeded with `(filename, width, height)`
/// records using default shared settings.
pub fn coordinator_with(
    service: Arc<FakeService>,
    sources: &[(&str, u32, u32)],
) -> (Coordinator, Vec<RecordId>) {
    let mut store = RecordStore::new();
    let defaults = SharedSettings::default();
    let ids = sources
        .iter()
        .map(|(name, width, height)| store.insert(source(name, *width, *height), &defaults))
        .collect();
    (
        Coordinator::new(Arc::new(Mutex::new(store)), service),
        ids,
    )
}

/// Observer that records every callback for assertions.
#[derive(Default)]
pub struct RecordingObserver {
    pub notices: StdMutex<Vec<String>>,
    pub settled: StdMutex<Vec<(String, bool)>>,
    pub started: StdMutex<Vec<usize>>,
    pub finished: StdMutex<Vec<BatchSummary>>,
    pub confirm: AtomicBool,
    pub confirm_requests: StdMutex<Vec<usize>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirming() -> Self {
        let observer = Self::default();
        observer.confirm.store(true, Ordering::SeqCst);
        observer
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn settled(&self) -> Vec<(String, bool)> {
        self.settled.lock().unwrap().clone()
    }
}

impl BatchObserver for RecordingObserver {
    fn batch_started(&self, total: usize) {
        self.started.lock().unwrap().push(total);
    }

    fn record_settled(&self, filename: &str, succeeded: bool) {
        self.settled
            .lock()
            .unwrap()
            .push((filename.to_string(), succeeded));
    }

    fn batch_finished(&self, summary: &BatchSummary) {
        self.finished.lock().unwrap().push(*summary);
    }

    fn notice(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn confirm_process_pending(&self, pending: usize) -> bool {
        self.confirm_requests.lock().unwrap().push(pending);
        self.confirm.load(Ordering::SeqCst)
    }
}
