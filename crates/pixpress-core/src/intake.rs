//! Client-side screening of upload candidates and admission of server
//! metadata into the record store.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::consts::ACCEPTED_EXTENSIONS;
use crate::error::PixpressError;
use crate::record::{RecordId, SourceInfo};
use crate::remote::api::{UploadFile, UploadOutcome};
use crate::settings::SharedSettings;
use crate::store::RecordStore;

fn accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Screen candidate files and read the ones worth sending.
///
/// Unsupported types, empty files, and unreadable paths produce per-file
/// rejection messages and are never uploaded. Screening one bad file does
/// not affect its siblings.
pub async fn prepare_uploads(paths: &[PathBuf]) -> (Vec<UploadFile>, Vec<String>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut rejected = Vec::new();

    for path in paths {
        let name = display_name(path);
        if !accepted_extension(path) {
            warn!(file = %name, "Skipping unsupported file type");
            rejected.push(PixpressError::UnsupportedFile(name).to_string());
            continue;
        }
        match tokio::fs::read(path).await {
            Ok(bytes) if bytes.is_empty() => {
                warn!(file = %name, "Skipping empty file");
                rejected.push(PixpressError::EmptyFile(name).to_string());
            }
            Ok(bytes) => {
                debug!(file = %name, size_bytes = bytes.len(), "File queued for upload");
                files.push(UploadFile {
                    filename: name,
                    bytes,
                });
            }
            Err(err) => {
                warn!(file = %name, %err, "Skipping unreadable file");
                rejected.push(format!("Cannot read {name}: {err}"));
            }
        }
    }

    (files, rejected)
}

/// Create one record per accepted upload, seeded from the shared defaults.
/// Returns the new ids in upload order.
pub fn admit(
    store: &mut RecordStore,
    outcome: &UploadOutcome,
    defaults: &SharedSettings,
) -> Vec<RecordId> {
    outcome
        .uploaded_files
        .iter()
        .map(|info| {
            store.insert(
                SourceInfo {
                    filename: info.original_filename.clone(),
                    width: info.width,
                    height: info.height,
                    size_bytes: info.size_bytes,
                    format: info.format.to_ascii_lowercase(),
                },
                defaults,
            )
        })
        .collect()
}
