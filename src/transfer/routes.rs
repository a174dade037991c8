use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures::StreamExt;

use super::multipart_parser::MultipartParser;
use super::{export_json, import_json, photo_data_url, TransferError, EXPORT_FILENAME, MALFORMED_NOTICE};
use crate::document::common::attachment_disposition;
use crate::report::model::ReportRecord;
use crate::{AppState, ErrorResponse};

impl From<TransferError> for HttpResponse {
    fn from(error: TransferError) -> Self {
        match error {
            TransferError::Malformed(_) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(MALFORMED_NOTICE))
            }
            TransferError::EmptyFile => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
            }
            TransferError::Serialize(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
        }
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

#[utoipa::path(
    get,
    path = "/api/rapor/export",
    tag = "Transfer",
    responses(
        (status = 200, description = "Record as an indented JSON attachment named data.json", body = ReportRecord)
    )
)]
pub async fn export_record(state: web::Data<AppState>) -> impl Responder {
    let record = state.store.snapshot();
    match export_json(&record) {
        Ok(json) => {
            log::info!("Exported report record ({} bytes)", json.len());
            HttpResponse::Ok()
                .content_type("application/json")
                .insert_header(attachment_disposition(EXPORT_FILENAME))
                .body(json)
        }
        Err(e) => {
            log::error!("Failed to export report record: {}", e);
            HttpResponse::from(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/rapor/import",
    tag = "Transfer",
    request_body(content = ReportRecord, description = "A previously exported record, as the raw body or a multipart `file` field"),
    responses(
        (status = 200, description = "Record replaced", body = ReportRecord),
        (status = 400, description = "Not a valid record; current record unchanged", body = ErrorResponse)
    )
)]
pub async fn import_record(
    state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: web::Payload,
) -> impl Responder {
    let data = if is_multipart(&req) {
        match MultipartParser::parse_single_file(Multipart::new(req.headers(), payload)).await {
            Ok(file) => file.bytes,
            Err(e) => {
                log::warn!("Import upload rejected: {}", e);
                return HttpResponse::from(e);
            }
        }
    } else {
        let mut body = Vec::new();
        while let Some(chunk) = payload.next().await {
            match chunk {
                Ok(bytes) => body.extend_from_slice(&bytes),
                Err(e) => {
                    log::error!("Failed to read import body: {}", e);
                    return HttpResponse::BadRequest()
                        .json(ErrorResponse::bad_request(&e.to_string()));
                }
            }
        }
        body
    };

    match import_json(&data) {
        Ok(record) => {
            let record = state.store.replace(record);
            log::info!("Imported report record for {}", record.student.name);
            HttpResponse::Ok().json(record)
        }
        Err(e) => {
            log::warn!("Import rejected: {}", e);
            HttpResponse::from(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/rapor/photo",
    tag = "Transfer",
    request_body(content = String, content_type = "multipart/form-data", description = "Image in a `file` field"),
    responses(
        (status = 200, description = "Photo embedded in the record", body = ReportRecord),
        (status = 400, description = "Missing or empty file", body = ErrorResponse)
    )
)]
pub async fn upload_photo(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let file = match MultipartParser::parse_single_file(payload).await {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Photo upload rejected: {}", e);
            return HttpResponse::from(e);
        }
    };

    let data_url = match photo_data_url(
        &file.bytes,
        file.content_type.as_deref(),
        file.filename.as_deref(),
    ) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Photo upload rejected: {}", e);
            return HttpResponse::from(e);
        }
    };

    log::info!("Embedded student photo ({} bytes)", file.bytes.len());
    let record = state.store.update(|r| r.with_photo(data_url));
    HttpResponse::Ok().json(record)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/export", web::get().to(export_record))
        .route("/import", web::post().to(import_record))
        .route("/photo", web::post().to(upload_photo));
}
