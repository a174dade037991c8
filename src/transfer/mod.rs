//! Transfer module - moving the record and the student photo in and out.
//!
//! - JSON export is the pretty-printed record, offered as `data.json`
//! - JSON import replaces the whole record, or leaves it untouched on error
//! - photo upload embeds the image into the record as a `data:` URL

pub mod file;
pub mod multipart_parser;
pub mod routes;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::report::model::ReportRecord;

pub const EXPORT_FILENAME: &str = "data.json";
pub const MALFORMED_NOTICE: &str = "Format salah.";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Format salah. {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("uploaded file is empty")]
    EmptyFile,
}

/// Serialize the record as indented JSON.
pub fn export_json(record: &ReportRecord) -> Result<String, TransferError> {
    serde_json::to_string_pretty(record).map_err(TransferError::Serialize)
}

/// Parse a previously exported record.
///
/// Missing fields take their defaults; values of the wrong type are rejected.
pub fn import_json(data: &[u8]) -> Result<ReportRecord, TransferError> {
    serde_json::from_slice(data).map_err(TransferError::Malformed)
}

/// Image bytes recovered from a `data:` URL.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode a base64 `data:` URL; anything else yields `None`.
pub fn decode_data_url(url: &str) -> Option<EmbeddedImage> {
    let rest = url.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    if bytes.is_empty() {
        return None;
    }

    let mime = if mime.is_empty() {
        file::detect_mime_from_bytes(&bytes)?.to_string()
    } else {
        mime.to_string()
    };

    Some(EmbeddedImage { mime, bytes })
}

/// Turn an uploaded image into the `data:` URL stored in the record.
///
/// The bytes are embedded as they are; size and format are not checked.
pub fn photo_data_url(
    bytes: &[u8],
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<String, TransferError> {
    if bytes.is_empty() {
        return Err(TransferError::EmptyFile);
    }

    let mime = file::resolve_mime(bytes, content_type, filename);
    Ok(encode_data_url(&mime, bytes))
}
