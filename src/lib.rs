use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod assistant;
pub mod config;
pub mod document;
pub mod guard;
pub mod report;
pub mod state;
pub mod transfer;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn bad_gateway(message: &str) -> Self {
        Self::new("BadGateway", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::report::routes::get_record,
        crate::report::routes::update_student,
        crate::report::routes::update_health,
        crate::report::routes::update_attendance,
        crate::report::routes::update_signature,
        crate::report::routes::update_texts,
        crate::report::routes::update_development_item,
        crate::report::routes::update_character_item,
        crate::report::routes::add_daily_activity,
        crate::report::routes::update_daily_activity,
        crate::report::routes::remove_daily_activity,
        crate::report::routes::add_extracurricular,
        crate::report::routes::update_extracurricular,
        crate::report::routes::remove_extracurricular,
        crate::assistant::routes::generate_narrative,
        crate::transfer::routes::export_record,
        crate::transfer::routes::import_record,
        crate::transfer::routes::upload_photo,
        crate::document::routes::get_preview,
        crate::document::routes::download_pdf,
        crate::document::routes::download_snapshot
    ),
    components(
        schemas(
            report::model::ReportRecord,
            report::model::StudentInfo,
            report::model::HealthData,
            report::model::DevelopmentItem,
            report::model::DailyActivity,
            report::model::CharacterItem,
            report::model::Attendance,
            report::model::Extracurricular,
            report::model::SignatureBlock,
            report::model::Semester,
            report::model::DevelopmentLevel,
            report::model::CharacterScore,
            report::model::Grade,
            report::model::StudentPatch,
            report::model::HealthPatch,
            report::model::AttendancePatch,
            report::model::SignaturePatch,
            report::model::TextsPatch,
            report::model::DevelopmentItemPatch,
            report::model::DailyActivityPatch,
            report::model::CharacterItemPatch,
            report::model::ExtracurricularPatch,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Rapor", description = "Field editors for the report record."),
        (name = "Assistant", description = "Narrative drafting with a generative-text model."),
        (name = "Transfer", description = "JSON export/import and photo upload."),
        (name = "Document", description = "Preview and PDF capture.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

/// Record payloads carry the photo as a `data:` URL.
const JSON_LIMIT: usize = 16 * 1024 * 1024;

/// Register every `/api/rapor` endpoint.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/rapor")
            .app_data(web::JsonConfig::default().limit(JSON_LIMIT))
            .configure(report::routes::configure)
            .configure(assistant::routes::configure)
            .configure(transfer::routes::configure)
            .configure(document::routes::configure),
    );
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise application state: {}", e);
            std::process::exit(1);
        }
    };
    app_state.spawn_render_worker();

    let prometheus = PrometheusMetricsBuilder::new("rapor_tk")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure_api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
