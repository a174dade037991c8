mod common;

use actix_web::http::header;
use actix_web::{http::StatusCode, test, App};
use common::{create_test_app_state, MockNarrativeService, MockPdfBackend};
use rapor_tk::configure_api;
use rapor_tk::document::OutputFormat;
use rapor_tk::report::model::StudentPatch;
use std::sync::Arc;

#[actix_web::test]
async fn test_pdf_download_is_named_after_student() {
    let backend = Arc::new(MockPdfBackend::default());
    let state = create_test_app_state(
        Arc::new(MockNarrativeService::answering("{}")),
        backend.clone(),
        None,
    );
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_api)).await;

    let req = test::TestRequest::get().uri("/api/rapor/pdf").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("Rapor_Muhammad_Fatih_Al-Farisi_Ganjil.pdf"));

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF"));

    let documents = backend.documents.lock();
    assert_eq!(documents.len(), 1);
    let (source, format) = &documents[0];
    assert_eq!(*format, OutputFormat::Pdf);
    assert!(!source.contains("Tambah Baris"));
    assert!(source.contains("margin: (top: 20mm, right: 15mm, bottom: 21mm, left: 23mm)"));
    assert!(!state.documents.is_capturing());
}

#[actix_web::test]
async fn test_snapshot_returns_png() {
    let backend = Arc::new(MockPdfBackend::default());
    let state = create_test_app_state(
        Arc::new(MockNarrativeService::answering("{}")),
        backend.clone(),
        None,
    );
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_api)).await;

    let req = test::TestRequest::get().uri("/api/rapor/snapshot").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(backend.documents.lock()[0].1, OutputFormat::Png);
}

#[actix_web::test]
async fn test_failed_capture_reports_and_resets_flag() {
    let state = create_test_app_state(
        Arc::new(MockNarrativeService::answering("{}")),
        Arc::new(MockPdfBackend::failing()),
        None,
    );
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_api)).await;

    let req = test::TestRequest::get().uri("/api/rapor/pdf").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Gagal menyimpan PDF."));
    assert!(!state.documents.is_capturing());
}

#[actix_web::test]
async fn test_preview_shows_edit_chrome() {
    let state = create_test_app_state(
        Arc::new(MockNarrativeService::answering("{}")),
        Arc::new(MockPdfBackend::default()),
        None,
    );
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_api)).await;

    let req = test::TestRequest::get().uri("/api/rapor/preview").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let source = String::from_utf8(body.to_vec()).unwrap();

    assert!(source.contains("Tambah Baris"));
    assert!(source.contains("#kop("));
    assert!(source.contains("Muhammad Fatih Al-Farisi"));
}

#[actix_web::test]
async fn test_pdf_download_with_non_ascii_name() {
    let state = create_test_app_state(
        Arc::new(MockNarrativeService::answering("{}")),
        Arc::new(MockPdfBackend::default()),
        None,
    );
    state.store.update(|record| {
        record.with_student(StudentPatch {
            name: Some("Zoë Ananda".to_string()),
            ..Default::default()
        })
    });
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure_api)).await;

    let req = test::TestRequest::get().uri("/api/rapor/pdf").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("filename=\"Rapor_Zo__Ananda_Ganjil.pdf\""));
    assert!(disposition.contains("filename*=UTF-8''Rapor_Zo%C3%AB_Ananda_Ganjil.pdf"));
}
