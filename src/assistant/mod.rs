//! Assistant module - drafts sections D and H with a generative-text model.
//!
//! - `payload` - the reduced record sent to the model and the answer parsing
//! - `gemini` - the Gemini REST client
//! - `routes` - `POST /api/rapor/narrative`

pub mod gemini;
pub mod payload;
pub mod routes;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::guard::BusyFlag;
use crate::report::model::ReportRecord;
use crate::report::store::RecordStore;
use payload::{NarrativeTexts, PromptPayload};

pub const MISSING_CREDENTIAL_NOTICE: &str = "API Key belum diset!";
pub const SERVICE_FAILED_NOTICE: &str = "Gagal menghasilkan narasi.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("API Key belum diset!")]
    MissingCredential,
    #[error("narrative service failed: {0}")]
    Service(String),
    #[error("Narasi sedang ditulis...")]
    InProgress,
}

/// A model that turns the prompt payload into the two report texts.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        payload: &PromptPayload,
    ) -> Result<NarrativeTexts, AssistantError>;
}

/// Runs one narrative request at a time against a [`NarrativeService`].
pub struct NarrativeAssistant {
    api_key: Option<String>,
    service: Arc<dyn NarrativeService>,
    generating: BusyFlag,
}

impl NarrativeAssistant {
    pub fn new(api_key: Option<String>, service: Arc<dyn NarrativeService>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            service,
            generating: BusyFlag::new(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_set()
    }

    /// Ask the model for new texts and write them into the live record.
    ///
    /// Only `narrative` and `teacherNote` change, and only on success. Edits
    /// made while the request is running are kept.
    pub async fn write_narrative(&self, store: &RecordStore) -> Result<ReportRecord, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential)?;
        let _guard = self
            .generating
            .try_acquire()
            .ok_or(AssistantError::InProgress)?;

        let payload = PromptPayload::from(&store.snapshot());
        log::info!("Requesting narrative for {}", payload.student_name);

        let texts = self.service.generate(api_key, &payload).await?;

        Ok(store.update(|record| {
            record
                .with_narrative(texts.narrative)
                .with_teacher_note(texts.teacher_note)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::template::initial_record;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingService {
        calls: AtomicUsize,
        answer: Result<NarrativeTexts, String>,
        delay: Duration,
    }

    impl CountingService {
        fn answering(narrative: &str, note: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer: Ok(NarrativeTexts {
                    narrative: narrative.to_string(),
                    teacher_note: note.to_string(),
                }),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl NarrativeService for CountingService {
        async fn generate(
            &self,
            _api_key: &str,
            _payload: &PromptPayload,
        ) -> Result<NarrativeTexts, AssistantError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.answer.clone().map_err(AssistantError::Service)
        }
    }

    #[tokio::test]
    async fn test_success_overwrites_only_texts() {
        let service = Arc::new(CountingService::answering("Ananda ceria.", "Pertahankan!"));
        let assistant = NarrativeAssistant::new(Some("key".to_string()), service.clone());
        let store = RecordStore::new(initial_record());
        let before = store.snapshot();

        let after = assistant.write_narrative(&store).await.unwrap();

        assert_eq!(after.narrative, "Ananda ceria.");
        assert_eq!(after.teacher_note, "Pertahankan!");
        assert_eq!(
            ReportRecord {
                narrative: before.narrative.clone(),
                teacher_note: before.teacher_note.clone(),
                ..after.clone()
            },
            before
        );
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert!(!assistant.is_generating());
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let service = Arc::new(CountingService::answering("x", "y"));
        let assistant = NarrativeAssistant::new(Some("  ".to_string()), service.clone());
        let store = RecordStore::new(initial_record());
        let before = store.snapshot();

        let result = assistant.write_narrative(&store).await;

        assert!(matches!(result, Err(AssistantError::MissingCredential)));
        assert!(!assistant.has_credential());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_service_failure_leaves_record_and_clears_flag() {
        let service = Arc::new(CountingService {
            answer: Err("HTTP 503".to_string()),
            ..CountingService::answering("", "")
        });
        let assistant = NarrativeAssistant::new(Some("key".to_string()), service);
        let store = RecordStore::new(initial_record());
        let before = store.snapshot();

        let result = assistant.write_narrative(&store).await;

        assert!(matches!(result, Err(AssistantError::Service(_))));
        assert_eq!(store.snapshot(), before);
        assert!(!assistant.is_generating());
    }

    #[tokio::test]
    async fn test_concurrent_request_is_refused() {
        let service = Arc::new(CountingService {
            delay: Duration::from_millis(50),
            ..CountingService::answering("a", "b")
        });
        let assistant = NarrativeAssistant::new(Some("key".to_string()), service.clone());
        let store = RecordStore::new(initial_record());

        let (first, second) = tokio::join!(
            assistant.write_narrative(&store),
            assistant.write_narrative(&store)
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(AssistantError::InProgress)));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }
}
