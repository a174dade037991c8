use actix_web::{web, HttpResponse, Responder};

use super::{AssistantError, MISSING_CREDENTIAL_NOTICE, SERVICE_FAILED_NOTICE};
use crate::report::model::ReportRecord;
use crate::{AppState, ErrorResponse};

impl From<AssistantError> for HttpResponse {
    fn from(error: AssistantError) -> Self {
        match error {
            AssistantError::MissingCredential => HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request(MISSING_CREDENTIAL_NOTICE)),
            AssistantError::InProgress => {
                HttpResponse::Conflict().json(ErrorResponse::conflict(&error.to_string()))
            }
            AssistantError::Service(_) => {
                HttpResponse::BadGateway().json(ErrorResponse::bad_gateway(SERVICE_FAILED_NOTICE))
            }
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/rapor/narrative",
    tag = "Assistant",
    responses(
        (status = 200, description = "Narrative and teacher note rewritten", body = ReportRecord),
        (status = 400, description = "No API key configured", body = ErrorResponse),
        (status = 409, description = "A narrative request is already running", body = ErrorResponse),
        (status = 502, description = "The text generation service failed", body = ErrorResponse)
    )
)]
pub async fn generate_narrative(state: web::Data<AppState>) -> impl Responder {
    match state.assistant.write_narrative(&state.store).await {
        Ok(record) => {
            log::info!("Narrative written for {}", record.student.name);
            HttpResponse::Ok().json(record)
        }
        Err(AssistantError::Service(message)) => {
            log::error!("Error generating report: {}", message);
            HttpResponse::from(AssistantError::Service(message))
        }
        Err(e) => {
            log::warn!("Narrative request refused: {}", e);
            HttpResponse::from(e)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/narrative", web::post().to(generate_narrative));
}
