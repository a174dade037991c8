use std::sync::Arc;
use thiserror::Error;

use crate::assistant::gemini::GeminiClient;
use crate::assistant::{NarrativeAssistant, NarrativeService};
use crate::config::AppConfig;
use crate::document::worker::{start_render_worker, PreviewCache};
use crate::document::{
    CaptureOptions, DocumentError, DocumentService, PdfBackend, ReportRenderer, TypstRenderEngine,
};
use crate::report::{initial_record, RecordStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Everything the handlers share.
pub struct AppState {
    pub store: RecordStore,
    pub documents: Arc<DocumentService>,
    pub preview: PreviewCache,
    pub assistant: NarrativeAssistant,
}

impl AppState {
    /// Wire the production services from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(900))
            .user_agent("rapor-tk/0.1")
            .build()?;

        let options = CaptureOptions::default();
        let renderer = ReportRenderer::new(config.school.clone(), options.clone())?;
        let backend = Arc::new(TypstRenderEngine::new(&config.typst_bin, options.scale));
        let documents = DocumentService::new(renderer, backend, config.settle_delay);

        let gemini = Arc::new(GeminiClient::new(
            http_client,
            &config.gemini_api_base,
            &config.gemini_model,
        ));

        Ok(Self::new(
            documents,
            NarrativeAssistant::new(config.api_key.clone(), gemini),
        ))
    }

    /// Start from the fixed template with the given services.
    pub fn new(documents: DocumentService, assistant: NarrativeAssistant) -> Self {
        Self {
            store: RecordStore::new(initial_record()),
            documents: Arc::new(documents),
            preview: PreviewCache::new(),
            assistant,
        }
    }

    /// Convenience for tests and embedders that bring their own backends.
    pub fn with_services(
        renderer: ReportRenderer,
        backend: Arc<dyn PdfBackend>,
        narrative: Arc<dyn NarrativeService>,
        api_key: Option<String>,
    ) -> Self {
        Self::new(
            DocumentService::new(renderer, backend, std::time::Duration::ZERO),
            NarrativeAssistant::new(api_key, narrative),
        )
    }

    /// Spawn the preview render worker; must run inside a Tokio runtime.
    pub fn spawn_render_worker(&self) -> tokio::task::JoinHandle<()> {
        let receiver = self.store.subscribe();
        let documents = self.documents.clone();
        let preview = self.preview.clone();
        tokio::spawn(async move {
            start_render_worker(receiver, documents, preview).await;
        })
    }
}
