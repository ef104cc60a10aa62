use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::{debug, info};

use crate::consts::{DEFAULT_ARCHIVE_NAME, REQUEST_TIMEOUT_SECS, UPLOAD_FIELD};
use crate::error::{PixpressError, Result};

use super::api::{
    disposition_filename, Archive, BatchDownloadRequest, ErrorBody, TransformRequest,
    TransformResponse, UploadFile, UploadOutcome,
};
use super::RemoteService;

/// HTTP client for the transform server.
///
/// Requests carry a hard timeout so a stalled transform fails the record
/// instead of leaving it processing forever.
pub struct HttpService {
    client: Client,
    base: Url,
}

impl HttpService {
    /// Parse and validate the server base URL and build the client.
    pub fn connect(base: &str) -> Result<Self> {
        let base =
            Url::parse(base).map_err(|e| PixpressError::InvalidUrl(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(PixpressError::InvalidUrl(base.to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, base })
    }

    /// Join path segments onto the base URL. Segments are percent-encoded,
    /// so raw filenames are safe to pass through.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL an uploaded image's preview is served from.
    pub fn preview_url(&self, filename: &str) -> Url {
        self.endpoint(&["uploads", filename])
    }

    /// URL a processed result is served from.
    pub fn result_url(&self, filename: &str) -> Url {
        self.endpoint(&["processed", filename])
    }
}

/// Convert a non-success response into an API error, preferring the
/// server's own `error` message when the body parses.
async fn api_error(response: Response) -> PixpressError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => {
            let mut message = body.error.unwrap_or_else(|| status.to_string());
            if !body.details.is_empty() {
                message = format!("{message} ({})", body.details.join(", "));
            }
            message
        }
        Err(_) => status.to_string(),
    };
    PixpressError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn check(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(api_error(response).await)
    }
}

#[async_trait]
impl RemoteService for HttpService {
    async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadOutcome> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes).file_name(file.filename);
            form = form.part(UPLOAD_FIELD, part);
        }

        debug!(count, "Uploading files");
        let response = self
            .client
            .post(self.endpoint(&["upload"]))
            .multipart(form)
            .send()
            .await?;
        // 207 Multi-Status (some files rejected) still carries the outcome.
        let outcome: UploadOutcome = check(response).await?.json().await?;
        info!(
            accepted = outcome.uploaded_files.len(),
            rejected = outcome.errors.len(),
            "Upload complete"
        );
        Ok(outcome)
    }

    async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse> {
        debug!(
            filename = %request.filename,
            width = request.width,
            height = request.height,
            quality = request.quality,
            format = %request.format,
            enhance = request.enhance,
            "Requesting transform"
        );
        let response = self
            .client
            .post(self.endpoint(&["process"]))
            .json(request)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn fetch_archive(&self, filenames: &[String]) -> Result<Archive> {
        debug!(count = filenames.len(), "Requesting archive");
        let response = self
            .client
            .post(self.endpoint(&["download_batch"]))
            .json(&BatchDownloadRequest { filenames })
            .send()
            .await?;
        let response = check(response).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename)
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());
        let bytes = response.bytes().await?.to_vec();
        info!(filename = %filename, size_bytes = bytes.len(), "Archive received");
        Ok(Archive { filename, bytes })
    }

    async fn fetch_result(&self, filename: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.endpoint(&["download", filename]))
            .send()
            .await?;
        Ok(check(response).await?.bytes().await?.to_vec())
    }
}
