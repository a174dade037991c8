use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures::StreamExt;
use log::warn;

use crate::ErrorResponse;

/// A single file taken from a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("No file field found in upload")]
    MissingFile,
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::FieldError(_) | MultipartParseError::MissingFile => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
            }
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Read the first field whose name starts with `file`. Other fields are
    /// drained and ignored.
    pub async fn parse_single_file(
        mut multipart: Multipart,
    ) -> Result<UploadedFile, MultipartParseError> {
        let mut uploaded: Option<UploadedFile> = None;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let filename = content_disposition.get_filename().map(|s| s.to_string());
            let content_type = field.content_type().map(|m| m.essence_str().to_string());

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                buffer.extend_from_slice(&data_chunk);
            }

            if !name.starts_with("file") {
                warn!("Ignoring multipart field '{}'", name);
                continue;
            }

            if uploaded.is_none() {
                uploaded = Some(UploadedFile {
                    bytes: buffer,
                    filename: filename.map(sanitize_filename::sanitize),
                    content_type,
                });
            }
        }

        uploaded.ok_or(MultipartParseError::MissingFile)
    }
}
