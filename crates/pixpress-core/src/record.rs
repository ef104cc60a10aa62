use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PixpressError;
use crate::remote::api::{encode_segment, TransformRequest};
use crate::settings::SharedSettings;

/// Process-local identity of a record. Stable for the record's lifetime,
/// never reused within a session, distinct from the server filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Output format requested for a transform. `Original` is the sentinel for
/// "keep the source format"; the server resolves it from the stored file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
    Gif,
    Original,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Webp => write!(f, "webp"),
            Self::Gif => write!(f, "gif"),
            Self::Original => write!(f, "original"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PixpressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "gif" => Ok(Self::Gif),
            "original" => Ok(Self::Original),
            other => Err(PixpressError::UnknownFormat(other.to_string())),
        }
    }
}

/// Transform lifecycle of a record. `Error` keeps the failure reason for
/// display; it is replaced on the next settings edit or `process` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Pending,
    Processing,
    Done,
    Error(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Error(_) => write!(f, "error"),
        }
    }
}

/// Server-reported metadata for an uploaded image. Immutable after intake.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    /// Format as reported by the server, lowercase ("jpeg", "png", ...).
    pub format: String,
}

/// Result of a successful transform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedOutput {
    pub filename: String,
    pub size_bytes: u64,
}

/// One uploaded image: source metadata, editable transform settings, and
/// the transform outcome.
///
/// Status and output always move together: `output` is `Some` exactly when
/// the status is `Done`. All transitions go through the methods below so
/// the pairing cannot be broken from outside.
#[derive(Clone, Debug)]
pub struct ImageRecord {
    id: RecordId,
    source: SourceInfo,
    preview_path: String,
    width: u32,
    height: u32,
    quality: u8,
    format: OutputFormat,
    enhance: bool,
    status: Status,
    output: Option<ProcessedOutput>,
}

impl ImageRecord {
    pub(crate) fn new(id: RecordId, source: SourceInfo, defaults: &SharedSettings) -> Self {
        let preview_path = format!("/uploads/{}", encode_segment(&source.filename));
        Self {
            width: source.width,
            height: source.height,
            quality: defaults.quality,
            format: defaults.format,
            enhance: defaults.enhance,
            status: Status::Pending,
            output: None,
            preview_path,
            id,
            source,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Percent-encoded server path the preview is fetched from.
    pub fn preview_path(&self) -> &str {
        &self.preview_path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn enhance(&self) -> bool {
        self.enhance
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn output(&self) -> Option<&ProcessedOutput> {
        self.output.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    pub fn is_processing(&self) -> bool {
        self.status == Status::Processing
    }

    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    pub fn error_reason(&self) -> Option<&str> {
        match &self.status {
            Status::Error(reason) => Some(reason),
            _ => None,
        }
    }

    /// Snapshot of the record's current settings as a transform request.
    pub fn transform_request(&self) -> TransformRequest {
        TransformRequest {
            filename: self.source.filename.clone(),
            width: self.width,
            height: self.height,
            quality: self.quality,
            format: self.format,
            enhance: self.enhance,
        }
    }

    // Every settings setter invalidates the previous result: a record must
    // never show an output computed from different settings.

    pub(crate) fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.mark_pending();
    }

    pub(crate) fn set_quality(&mut self, quality: u8) {
        self.quality = quality;
        self.mark_pending();
    }

    pub(crate) fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
        self.mark_pending();
    }

    pub(crate) fn set_enhance(&mut self, enhance: bool) {
        self.enhance = enhance;
        self.mark_pending();
    }

    pub(crate) fn mark_pending(&mut self) {
        self.status = Status::Pending;
        self.output = None;
    }

    pub(crate) fn begin_processing(&mut self) {
        self.status = Status::Processing;
        self.output = None;
    }

    pub(crate) fn complete(&mut self, output: ProcessedOutput) {
        self.status = Status::Done;
        self.output = Some(output);
    }

    pub(crate) fn fail(&mut self, reason: String) {
        self.status = Status::Error(reason);
        self.output = None;
    }
}
