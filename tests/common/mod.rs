#![allow(dead_code)]

use actix_web::web;
use parking_lot::Mutex;
use rapor_tk::assistant::payload::{NarrativeTexts, PromptPayload};
use rapor_tk::assistant::{AssistantError, NarrativeService};
use rapor_tk::config::SchoolProfile;
use rapor_tk::document::{
    CaptureOptions, DocumentError, OutputFormat, PdfBackend, RenderedDocument, ReportRenderer,
};
use rapor_tk::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock narrative service answering with raw model text.
pub struct MockNarrativeService {
    calls: AtomicUsize,
    answer: Result<String, String>,
    payloads: Mutex<Vec<PromptPayload>>,
}

impl MockNarrativeService {
    pub fn answering(model_text: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            answer: Ok(model_text.to_string()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            answer: Err(message.to_string()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<PromptPayload> {
        self.payloads.lock().last().cloned()
    }
}

#[async_trait::async_trait]
impl NarrativeService for MockNarrativeService {
    async fn generate(
        &self,
        _api_key: &str,
        payload: &PromptPayload,
    ) -> Result<NarrativeTexts, AssistantError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().push(payload.clone());
        match &self.answer {
            Ok(text) => NarrativeTexts::from_model_text(text),
            Err(message) => Err(AssistantError::Service(message.clone())),
        }
    }
}

/// Mock compiler that returns fixed bytes and records what it was given.
#[derive(Default)]
pub struct MockPdfBackend {
    pub fail: bool,
    pub documents: Mutex<Vec<(String, OutputFormat)>>,
}

impl MockPdfBackend {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl PdfBackend for MockPdfBackend {
    fn compile(
        &self,
        document: &RenderedDocument,
        format: OutputFormat,
    ) -> Result<Vec<u8>, DocumentError> {
        self.documents.lock().push((document.source.clone(), format));
        if self.fail {
            return Err(DocumentError::TypstExit(1));
        }
        Ok(match format {
            OutputFormat::Pdf => b"%PDF-1.7 mock".to_vec(),
            OutputFormat::Png => vec![0x89, 0x50, 0x4E, 0x47],
        })
    }
}

pub fn renderer() -> ReportRenderer {
    ReportRenderer::new(SchoolProfile::default(), CaptureOptions::default())
        .expect("bundled template")
}

/// Create a test AppState wired to mocks.
pub fn create_test_app_state(
    narrative: Arc<MockNarrativeService>,
    backend: Arc<MockPdfBackend>,
    api_key: Option<&str>,
) -> web::Data<AppState> {
    web::Data::new(AppState::with_services(
        renderer(),
        backend,
        narrative,
        api_key.map(str::to_string),
    ))
}

pub fn default_test_app_state() -> web::Data<AppState> {
    create_test_app_state(
        Arc::new(MockNarrativeService::answering("{}")),
        Arc::new(MockPdfBackend::default()),
        Some("test-key"),
    )
}
