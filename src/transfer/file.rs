//! File utilities and MIME type detection for uploads.

/// Detect MIME type from filename, falling back to `application/octet-stream`.
pub fn detect_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Detect MIME type from file content magic bytes.
pub fn detect_mime_from_bytes(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }

    // PNG magic bytes
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }

    // JPEG magic bytes
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // JSON (starts with { or [)
    if data.starts_with(b"{") || data.starts_with(b"[") {
        return Some("application/json");
    }

    None
}

/// File extension the document compiler expects for an image MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "png",
    }
}

/// Best guess at the MIME type of an uploaded file.
///
/// The file name decides first, then the content, then the declared type.
pub fn resolve_mime(data: &[u8], declared: Option<&str>, filename: Option<&str>) -> String {
    if let Some(mime) = filename
        .map(detect_mime_type)
        .filter(|m| m != "application/octet-stream")
    {
        return mime;
    }
    if let Some(mime) = detect_mime_from_bytes(data) {
        return mime.to_string();
    }
    declared
        .filter(|d| !d.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string()
}
