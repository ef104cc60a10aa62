//! Retrieval of processed results, individually or as a combined archive.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::batch::{BatchObserver, Coordinator};
use crate::consts::DEFAULT_ARCHIVE_NAME;
use crate::error::{PixpressError, Result};
use crate::record::RecordId;

/// A file written to disk by a download.
#[derive(Clone, Debug)]
pub struct SavedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// An archive written to disk, with the number of results it covers.
#[derive(Clone, Debug)]
pub struct SavedArchive {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub included: usize,
}

/// Keep only the final path component of a server-supplied filename.
fn safe_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_ARCHIVE_NAME)
        .to_string()
}

/// Download every processed result as one archive into `dest_dir`.
///
/// When nothing is done yet but records are pending, the observer is asked
/// whether to process them first; declining, or ending up with no results,
/// returns `Ok(None)` without contacting the download endpoint. A server
/// failure surfaces as an error and nothing is written; a partial archive
/// is never accepted.
pub async fn download_all(
    coordinator: &Coordinator,
    observer: &dyn BatchObserver,
    dest_dir: &Path,
) -> Result<Option<SavedArchive>> {
    let mut filenames = { coordinator.store().lock().await.done_outputs() };

    if filenames.is_empty() {
        let pending = { coordinator.store().lock().await.pending_count() };
        if pending == 0 {
            observer.notice("No processed images available to download.");
            return Ok(None);
        }
        if !observer.confirm_process_pending(pending) {
            return Ok(None);
        }
        coordinator.process_all(observer).await;
        filenames = { coordinator.store().lock().await.done_outputs() };
        if filenames.is_empty() {
            observer.notice("Processing finished, but no files are available to download.");
            return Ok(None);
        }
    }

    let archive = coordinator.service().fetch_archive(&filenames).await?;
    let path = dest_dir.join(safe_filename(&archive.filename));
    tokio::fs::create_dir_all(dest_dir).await?;
    tokio::fs::write(&path, &archive.bytes).await?;
    info!(path = %path.display(), included = filenames.len(), "Archive saved");

    Ok(Some(SavedArchive {
        path,
        size_bytes: archive.bytes.len() as u64,
        included: filenames.len(),
    }))
}

/// Download one record's processed result into `dest_dir`.
///
/// The record must be done; anything else is rejected without a request.
pub async fn download_one(
    coordinator: &Coordinator,
    id: RecordId,
    dest_dir: &Path,
) -> Result<SavedFile> {
    let filename = {
        let store = coordinator.store().lock().await;
        let record = store.get(id).ok_or(PixpressError::RecordNotFound(id))?;
        record
            .output()
            .map(|o| o.filename.clone())
            .ok_or(PixpressError::NotProcessed(id))?
    };

    let bytes = coordinator.service().fetch_result(&filename).await?;
    let path = dest_dir.join(safe_filename(&filename));
    tokio::fs::create_dir_all(dest_dir).await?;
    tokio::fs::write(&path, &bytes).await?;
    info!(path = %path.display(), "Result saved");

    Ok(SavedFile {
        path,
        size_bytes: bytes.len() as u64,
    })
}
