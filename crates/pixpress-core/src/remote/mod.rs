pub mod api;
pub mod http;

use async_trait::async_trait;

use crate::error::Result;

pub use api::{
    Archive, TransformRequest, TransformResponse, UploadFile, UploadOutcome, UploadedFileInfo,
};
pub use http::HttpService;

/// Seam to the transform server. The orchestration layer only ever talks
/// through this trait, so tests substitute an in-memory implementation.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Upload raw image payloads. The outcome carries metadata for every
    /// accepted file plus per-file messages for the rejected ones.
    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadOutcome>;

    /// Run one transform. The response echoes the source filename so the
    /// caller can verify it answers the request it made.
    async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse>;

    /// Fetch a combined archive of the named processed files.
    async fn fetch_archive(&self, filenames: &[String]) -> Result<Archive>;

    /// Fetch one processed file's bytes.
    async fn fetch_result(&self, filename: &str) -> Result<Vec<u8>>;
}
