use thiserror::Error;

use crate::record::RecordId;
use crate::resolve::Axis;

#[derive(Error, Debug)]
pub enum PixpressError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid {axis} value: {value}")]
    InvalidDimension { axis: Axis, value: u32 },

    #[error("Quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("File type not allowed: {0}")]
    UnsupportedFile(String),

    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("No supported image files to upload")]
    NoValidFiles,

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response for {got} does not match requested {expected}")]
    MismatchedResponse { expected: String, got: String },

    #[error("No record {0}")]
    RecordNotFound(RecordId),

    #[error("Record {0} has no processed result")]
    NotProcessed(RecordId),
}

pub type Result<T> = std::result::Result<T, PixpressError>;
