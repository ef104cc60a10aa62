/// Lowest accepted quality setting. Zero would be meaningless to every
/// encoder the server supports, so it is rejected at the edge.
pub const QUALITY_MIN: u8 = 1;

/// Highest accepted quality setting.
pub const QUALITY_MAX: u8 = 100;

/// Quality a record starts with when no explicit default is given.
pub const DEFAULT_QUALITY: u8 = 80;

/// Smallest dimension a record may hold on either axis. Aspect-ratio
/// resolution clamps to this so extreme ratios never collapse to zero.
pub const MIN_DIMENSION: u32 = 1;

/// File extensions accepted for upload, matched case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

/// Multipart field name the upload endpoint reads files from.
pub const UPLOAD_FIELD: &str = "files";

/// Archive filename used when the server sends no usable hint.
pub const DEFAULT_ARCHIVE_NAME: &str = "processed_images.zip";

/// Per-request timeout. A transform that exceeds this fails the record
/// instead of leaving it in `processing` indefinitely.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;
