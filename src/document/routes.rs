use actix_web::{web, HttpResponse, Responder};

use super::common::attachment_disposition;
use super::{DocumentError, GeneratedDocument, OutputFormat};
use crate::{AppState, ErrorResponse};

pub const CAPTURE_FAILED: &str = "Gagal menyimpan PDF.";

impl From<DocumentError> for HttpResponse {
    fn from(error: DocumentError) -> Self {
        match error {
            DocumentError::CaptureInProgress => {
                HttpResponse::Conflict().json(ErrorResponse::conflict(&error.to_string()))
            }
            _ => HttpResponse::InternalServerError().json(ErrorResponse::internal_error(
                &format!("{} ({})", CAPTURE_FAILED, error),
            )),
        }
    }
}

fn attachment(document: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.format.mime_type())
        .insert_header(attachment_disposition(&document.filename))
        .body(document.bytes)
}

async fn capture(state: &web::Data<AppState>, format: OutputFormat) -> HttpResponse {
    match state.documents.capture(&state.store, format).await {
        Ok(document) => attachment(document),
        Err(e) => {
            log::error!("Capture failed: {}", e);
            e.into()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/rapor/preview",
    tag = "Document",
    responses(
        (status = 200, description = "Typst source of the current edit-mode render", body = String, content_type = "text/plain")
    )
)]
pub async fn get_preview(state: web::Data<AppState>) -> impl Responder {
    let mut source = state.preview.get();
    if source.is_empty() {
        // Worker has not rendered yet
        source = state.documents.preview(&state.store.snapshot()).source;
    }
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(source)
}

#[utoipa::path(
    get,
    path = "/api/rapor/pdf",
    tag = "Document",
    responses(
        (status = 200, description = "Report captured as PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 409, description = "Another capture is running", body = ErrorResponse),
        (status = 500, description = "PDF compiler failed", body = ErrorResponse)
    )
)]
pub async fn download_pdf(state: web::Data<AppState>) -> impl Responder {
    log::info!("PDF capture requested");
    capture(&state, OutputFormat::Pdf).await
}

#[utoipa::path(
    get,
    path = "/api/rapor/snapshot",
    tag = "Document",
    responses(
        (status = 200, description = "First page captured as PNG", body = Vec<u8>, content_type = "image/png"),
        (status = 409, description = "Another capture is running", body = ErrorResponse),
        (status = 500, description = "PDF compiler failed", body = ErrorResponse)
    )
)]
pub async fn download_snapshot(state: web::Data<AppState>) -> impl Responder {
    log::info!("PNG snapshot requested");
    capture(&state, OutputFormat::Png).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/preview", web::get().to(get_preview))
        .route("/pdf", web::get().to(download_pdf))
        .route("/snapshot", web::get().to(download_snapshot));
}
