//! Field editor endpoints. Every editing call answers with the full record.

use actix_web::{web, HttpResponse, Responder};

use crate::report::model::{
    AttendancePatch, CharacterItemPatch, DailyActivityPatch, DevelopmentItemPatch,
    ExtracurricularPatch, HealthPatch, ReportRecord, SignaturePatch, StudentPatch, TextsPatch,
};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/rapor",
    tag = "Rapor",
    responses(
        (status = 200, description = "Current report record", body = ReportRecord)
    )
)]
pub async fn get_record(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.store.snapshot())
}

#[utoipa::path(
    put,
    path = "/api/rapor/student",
    tag = "Rapor",
    request_body = StudentPatch,
    responses(
        (status = 200, description = "Student identity updated", body = ReportRecord)
    )
)]
pub async fn update_student(
    state: web::Data<AppState>,
    patch: web::Json<StudentPatch>,
) -> impl Responder {
    log::debug!("Updating student identity");
    let record = state.store.update(|r| r.with_student(patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/health",
    tag = "Rapor",
    request_body = HealthPatch,
    responses(
        (status = 200, description = "Health data updated", body = ReportRecord)
    )
)]
pub async fn update_health(
    state: web::Data<AppState>,
    patch: web::Json<HealthPatch>,
) -> impl Responder {
    log::debug!("Updating health data");
    let record = state.store.update(|r| r.with_health(patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/attendance",
    tag = "Rapor",
    request_body = AttendancePatch,
    responses(
        (status = 200, description = "Attendance updated", body = ReportRecord)
    )
)]
pub async fn update_attendance(
    state: web::Data<AppState>,
    patch: web::Json<AttendancePatch>,
) -> impl Responder {
    log::debug!("Updating attendance");
    let record = state.store.update(|r| r.with_attendance(patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/signature",
    tag = "Rapor",
    request_body = SignaturePatch,
    responses(
        (status = 200, description = "Signature block updated", body = ReportRecord)
    )
)]
pub async fn update_signature(
    state: web::Data<AppState>,
    patch: web::Json<SignaturePatch>,
) -> impl Responder {
    log::debug!("Updating signature block");
    let record = state.store.update(|r| r.with_signature(patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/texts",
    tag = "Rapor",
    request_body = TextsPatch,
    responses(
        (status = 200, description = "Narrative or teacher note updated", body = ReportRecord)
    )
)]
pub async fn update_texts(
    state: web::Data<AppState>,
    patch: web::Json<TextsPatch>,
) -> impl Responder {
    log::debug!("Updating narrative texts");
    let record = state.store.update(|r| r.with_texts(patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/cppa/{id}",
    tag = "Rapor",
    params(
        ("id" = String, Path, description = "Development item ID")
    ),
    request_body = DevelopmentItemPatch,
    responses(
        (status = 200, description = "Development item updated; unknown ids leave the record unchanged", body = ReportRecord)
    )
)]
pub async fn update_development_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    patch: web::Json<DevelopmentItemPatch>,
) -> impl Responder {
    let id = path.into_inner();
    log::debug!("Updating development item {}", id);
    let record = state
        .store
        .update(|r| r.update_development_item(&id, patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/character/{id}",
    tag = "Rapor",
    params(
        ("id" = String, Path, description = "Character item ID")
    ),
    request_body = CharacterItemPatch,
    responses(
        (status = 200, description = "Character item updated", body = ReportRecord)
    )
)]
pub async fn update_character_item(
    state: web::Data<AppState>,
    path: web::Path<String>,
    patch: web::Json<CharacterItemPatch>,
) -> impl Responder {
    let id = path.into_inner();
    log::debug!("Updating character item {}", id);
    let record = state
        .store
        .update(|r| r.update_character_item(&id, patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    post,
    path = "/api/rapor/daily",
    tag = "Rapor",
    responses(
        (status = 200, description = "Empty daily activity appended", body = ReportRecord)
    )
)]
pub async fn add_daily_activity(state: web::Data<AppState>) -> impl Responder {
    let (record, id) = state.store.update_with(|r| r.add_daily_activity());
    log::debug!("Added daily activity {}", id);
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/daily/{id}",
    tag = "Rapor",
    params(
        ("id" = String, Path, description = "Daily activity ID")
    ),
    request_body = DailyActivityPatch,
    responses(
        (status = 200, description = "Daily activity updated", body = ReportRecord)
    )
)]
pub async fn update_daily_activity(
    state: web::Data<AppState>,
    path: web::Path<String>,
    patch: web::Json<DailyActivityPatch>,
) -> impl Responder {
    let id = path.into_inner();
    log::debug!("Updating daily activity {}", id);
    let record = state
        .store
        .update(|r| r.update_daily_activity(&id, patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    delete,
    path = "/api/rapor/daily/{id}",
    tag = "Rapor",
    params(
        ("id" = String, Path, description = "Daily activity ID")
    ),
    responses(
        (status = 200, description = "Daily activity removed", body = ReportRecord)
    )
)]
pub async fn remove_daily_activity(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    log::debug!("Removing daily activity {}", id);
    let record = state.store.update(|r| r.remove_daily_activity(&id));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    post,
    path = "/api/rapor/extras",
    tag = "Rapor",
    responses(
        (status = 200, description = "Empty extracurricular appended", body = ReportRecord)
    )
)]
pub async fn add_extracurricular(state: web::Data<AppState>) -> impl Responder {
    let (record, id) = state.store.update_with(|r| r.add_extracurricular());
    log::debug!("Added extracurricular {}", id);
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    put,
    path = "/api/rapor/extras/{id}",
    tag = "Rapor",
    params(
        ("id" = String, Path, description = "Extracurricular ID")
    ),
    request_body = ExtracurricularPatch,
    responses(
        (status = 200, description = "Extracurricular updated", body = ReportRecord)
    )
)]
pub async fn update_extracurricular(
    state: web::Data<AppState>,
    path: web::Path<String>,
    patch: web::Json<ExtracurricularPatch>,
) -> impl Responder {
    let id = path.into_inner();
    log::debug!("Updating extracurricular {}", id);
    let record = state
        .store
        .update(|r| r.update_extracurricular(&id, patch.into_inner()));
    HttpResponse::Ok().json(record)
}

#[utoipa::path(
    delete,
    path = "/api/rapor/extras/{id}",
    tag = "Rapor",
    params(
        ("id" = String, Path, description = "Extracurricular ID")
    ),
    responses(
        (status = 200, description = "Extracurricular removed", body = ReportRecord)
    )
)]
pub async fn remove_extracurricular(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    log::debug!("Removing extracurricular {}", id);
    let record = state.store.update(|r| r.remove_extracurricular(&id));
    HttpResponse::Ok().json(record)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(get_record))
        .route("/student", web::put().to(update_student))
        .route("/health", web::put().to(update_health))
        .route("/attendance", web::put().to(update_attendance))
        .route("/signature", web::put().to(update_signature))
        .route("/texts", web::put().to(update_texts))
        .route("/cppa/{id}", web::put().to(update_development_item))
        .route("/character/{id}", web::put().to(update_character_item))
        .route("/daily", web::post().to(add_daily_activity))
        .service(
            web::resource("/daily/{id}")
                .route(web::put().to(update_daily_activity))
                .route(web::delete().to(remove_daily_activity)),
        )
        .route("/extras", web::post().to(add_extracurricular))
        .service(
            web::resource("/extras/{id}")
                .route(web::put().to(update_extracurricular))
                .route(web::delete().to(remove_extracurricular)),
        );
}
