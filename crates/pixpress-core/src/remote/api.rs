//! Wire types for the transform server, mirroring its JSON contracts.

use serde::{Deserialize, Serialize};

use crate::record::OutputFormat;

/// Body of a transform call. `format` serializes lowercase, with
/// `"original"` as the keep-source-format sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub format: OutputFormat,
    pub enhance: bool,
}

/// Successful transform reply. `original_filename` must match the request;
/// a mismatch is treated as a failed call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformResponse {
    pub original_filename: String,
    pub processed_filename: String,
    pub processed_size_bytes: u64,
}

/// Metadata the server reports for each accepted upload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadedFileInfo {
    pub original_filename: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: u64,
}

/// Upload reply: accepted files plus per-file messages for rejected ones.
/// A partially failed upload (some accepted, some rejected) is a success.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFileInfo>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// One raw image payload, screened client-side before upload.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Archive returned by a batch download, with the server's filename hint.
#[derive(Clone, Debug)]
pub struct Archive {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
pub(crate) struct BatchDownloadRequest<'a> {
    pub filenames: &'a [String],
}

/// Error payload the server attaches to non-success responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Percent-encode a filename for use as a single URL path segment.
/// Unreserved characters pass through; everything else is escaped.
pub fn encode_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Decode percent-escapes. Malformed escapes are passed through verbatim.
pub fn decode_segment(value: &str) -> String {
    fn hex(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'a'..=b'f' => Some(byte - b'a' + 10),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Extract the filename hint from a `Content-Disposition` header value.
///
/// Prefers the RFC 5987 `filename*=` form over plain `filename=`; both are
/// URL-decoded. Returns `None` when neither parameter is present.
pub fn disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    for param in value.split(';') {
        let param = param.trim();
        if let Some(rest) = param.strip_prefix("filename*=") {
            let rest = rest.trim_matches(|c| c == '"' || c == '\'');
            // charset''value form; the value follows the last ''.
            let encoded = rest.rsplit("''").next().unwrap_or(rest);
            return Some(decode_segment(encoded));
        }
        if let Some(rest) = param.strip_prefix("filename=") {
            plain = Some(decode_segment(rest.trim_matches('"')));
        }
    }
    plain
}
