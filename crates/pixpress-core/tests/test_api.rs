use std::str::FromStr;

use pixpress_core::error::PixpressError;
use pixpress_core::record::OutputFormat;
use pixpress_core::remote::api::{decode_segment, disposition_filename, encode_segment};
use pixpress_core::remote::{HttpService, TransformRequest, TransformResponse, UploadOutcome};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[test]
fn test_transform_request_serializes_lowercase_format() {
    let request = TransformRequest {
        filename: "shot.png".to_string(),
        width: 800,
        height: 450,
        quality: 80,
        format: OutputFormat::Original,
        enhance: true,
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["filename"], "shot.png");
    assert_eq!(json["width"], 800);
    assert_eq!(json["format"], "original");
    assert_eq!(json["enhance"], true);
}

#[test]
fn test_transform_response_parses_server_reply() {
    let json = r#"{
        "message": "Image processed successfully",
        "original_filename": "shot.png",
        "processed_filename": "shot_1234.webp",
        "processed_size_bytes": 20480
    }"#;
    let response: TransformResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.original_filename, "shot.png");
    assert_eq!(response.processed_filename, "shot_1234.webp");
    assert_eq!(response.processed_size_bytes, 20_480);
}

#[test]
fn test_upload_outcome_tolerates_missing_fields() {
    let with_errors: UploadOutcome = serde_json::from_str(
        r#"{"message": "Files uploaded with some errors",
            "uploaded_files": [{"original_filename": "a.png", "width": 10,
                                "height": 20, "format": "png", "size_bytes": 5}],
            "errors": ["File type not allowed: doc.pdf"]}"#,
    )
    .unwrap();
    assert_eq!(with_errors.uploaded_files.len(), 1);
    assert_eq!(with_errors.errors.len(), 1);

    let clean: UploadOutcome =
        serde_json::from_str(r#"{"uploaded_files": []}"#).unwrap();
    assert!(clean.uploaded_files.is_empty());
    assert!(clean.errors.is_empty());
}

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

#[test]
fn test_output_format_from_str_accepts_aliases() {
    assert_eq!(OutputFormat::from_str("jpg").unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_str("JPEG").unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_str("webp").unwrap(), OutputFormat::Webp);
    assert_eq!(
        OutputFormat::from_str("original").unwrap(),
        OutputFormat::Original
    );
    assert!(OutputFormat::from_str("tiff").is_err());
}

#[test]
fn test_output_format_display_matches_wire_form() {
    for format in [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Webp,
        OutputFormat::Gif,
        OutputFormat::Original,
    ] {
        let displayed = format.to_string();
        let json = serde_json::to_value(format).unwrap();
        assert_eq!(json, displayed);
    }
}

// ---------------------------------------------------------------------------
// Path segment encoding
// ---------------------------------------------------------------------------

#[test]
fn test_encode_segment_escapes_reserved_characters() {
    assert_eq!(encode_segment("plain-name_1.png"), "plain-name_1.png");
    assert_eq!(encode_segment("my photo.png"), "my%20photo.png");
    assert_eq!(encode_segment("a/b?.png"), "a%2Fb%3F.png");
}

#[test]
fn test_decode_segment_round_trips() {
    for name in ["plain.png", "my photo.png", "sp%cial & odd.webp"] {
        assert_eq!(decode_segment(&encode_segment(name)), name);
    }
}

#[test]
fn test_decode_segment_passes_malformed_escapes_through() {
    assert_eq!(decode_segment("bad%zzescape"), "bad%zzescape");
    assert_eq!(decode_segment("trailing%2"), "trailing%2");
}

// ---------------------------------------------------------------------------
// Content-Disposition filename hint
// ---------------------------------------------------------------------------

#[test]
fn test_disposition_plain_filename() {
    let value = "attachment; filename=processed_images_abc.zip";
    assert_eq!(
        disposition_filename(value).as_deref(),
        Some("processed_images_abc.zip")
    );
}

#[test]
fn test_disposition_quoted_filename() {
    let value = r#"attachment; filename="processed images.zip""#;
    assert_eq!(
        disposition_filename(value).as_deref(),
        Some("processed images.zip")
    );
}

#[test]
fn test_disposition_extended_filename_wins_and_is_decoded() {
    let value = "attachment; filename=fallback.zip; filename*=UTF-8''my%20archive.zip";
    assert_eq!(
        disposition_filename(value).as_deref(),
        Some("my archive.zip")
    );
}

#[test]
fn test_disposition_without_filename_is_none() {
    assert_eq!(disposition_filename("inline"), None);
}

// ---------------------------------------------------------------------------
// URL building
// ---------------------------------------------------------------------------

#[test]
fn test_preview_and_result_urls_encode_filenames() {
    let service = HttpService::connect("http://localhost:5000").unwrap();
    assert_eq!(
        service.preview_url("my photo.png").as_str(),
        "http://localhost:5000/uploads/my%20photo.png"
    );
    assert_eq!(
        service.result_url("shot_1234.webp").as_str(),
        "http://localhost:5000/processed/shot_1234.webp"
    );
}

#[test]
fn test_connect_rejects_unusable_urls() {
    assert!(matches!(
        HttpService::connect("not a url"),
        Err(PixpressError::InvalidUrl(_))
    ));
    assert!(matches!(
        HttpService::connect("data:text/plain,hello"),
        Err(PixpressError::InvalidUrl(_))
    ));
}
