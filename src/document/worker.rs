//! Background render worker for the edit-mode preview.
//!
//! Subscribes to the record store and re-renders the preview after each
//! burst of edits, so `GET /api/rapor/preview` never waits on the renderer.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use super::capture::DocumentService;
use crate::report::model::ReportRecord;

const DEBOUNCE_MS: u64 = 150;

/// Latest rendered preview source.
#[derive(Clone, Default)]
pub struct PreviewCache {
    inner: Arc<RwLock<String>>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> String {
        self.inner.read().clone()
    }

    pub fn set(&self, source: String) {
        *self.inner.write() = source;
    }
}

/// Starts the preview render worker.
///
/// Renders the current record once, then again whenever the store publishes
/// a new record. Records published within the debounce window collapse into
/// a single render of the newest one. Stops when the store is dropped.
pub async fn start_render_worker(
    mut receiver: watch::Receiver<ReportRecord>,
    service: Arc<DocumentService>,
    cache: PreviewCache,
) {
    log::info!("Preview render worker started");

    let initial = receiver.borrow_and_update().clone();
    cache.set(service.preview(&initial).source);

    while receiver.changed().await.is_ok() {
        sleep(Duration::from_millis(DEBOUNCE_MS)).await;

        // Only the newest record matters after the wait
        let latest = receiver.borrow_and_update().clone();
        let rendered = service.preview(&latest);
        log::debug!(
            "Preview re-rendered ({} bytes, {} assets)",
            rendered.source.len(),
            rendered.assets.len()
        );
        cache.set(rendered.source);
    }

    log::info!("Preview render worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchoolProfile;
    use crate::document::{CaptureOptions, ReportRenderer, TypstRenderEngine};
    use crate::report::store::RecordStore;
    use crate::report::template::initial_record;

    fn service() -> Arc<DocumentService> {
        let renderer = ReportRenderer::with_template(
            String::new(),
            SchoolProfile::default(),
            CaptureOptions::default(),
        );
        Arc::new(DocumentService::new(
            renderer,
            Arc::new(TypstRenderEngine::default()),
            Duration::ZERO,
        ))
    }

    #[tokio::test]
    async fn test_worker_renders_initial_and_updated_record() {
        let store = RecordStore::new(initial_record());
        let cache = PreviewCache::new();
        let handle = tokio::spawn(start_render_worker(
            store.subscribe(),
            service(),
            cache.clone(),
        ));

        sleep(Duration::from_millis(50)).await;
        assert!(cache.get().contains("Muhammad Fatih Al-Farisi"));

        store.update(|r| r.with_teacher_note("Pertahankan prestasimu!".to_string()));
        store.update(|r| r.with_teacher_note("Terus semangat belajar!".to_string()));
        sleep(Duration::from_millis(DEBOUNCE_MS + 200)).await;

        let preview = cache.get();
        assert!(preview.contains("Terus semangat belajar!"));
        assert!(!preview.contains("Pertahankan prestasimu!"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_worker_stops_when_store_dropped() {
        let store = RecordStore::new(initial_record());
        let receiver = store.subscribe();
        drop(store);

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            start_render_worker(receiver, service(), PreviewCache::new()),
        )
        .await;
        assert!(result.is_ok());
    }
}
