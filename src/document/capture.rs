//! Guarded capture of the report into a downloadable file.

use std::sync::Arc;
use std::time::Duration;

use super::common::output_filename;
use super::render::{RenderMode, RenderedDocument, ReportRenderer};
use super::traits::PdfBackend;
use super::{DocumentError, GeneratedDocument, OutputFormat};
use crate::guard::BusyFlag;
use crate::report::model::ReportRecord;
use crate::report::store::RecordStore;

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 15.0,
            bottom: 21.0,
            left: 23.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    pub paper: String,
    pub landscape: bool,
    pub margins: PageMargins,
    /// Raster scale factor; PNG snapshots use `72 * scale` ppi
    pub scale: f32,
    /// Keep sections whole and start section D on a fresh page when needed
    pub page_breaks: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            landscape: false,
            margins: PageMargins::default(),
            scale: 2.0,
            page_breaks: true,
        }
    }
}

/// Renders previews and runs the capture flow.
///
/// Only one capture runs at a time. While it runs, [`DocumentService::mode`]
/// reports [`RenderMode::Capture`] so previews drop their editing aids too.
pub struct DocumentService {
    renderer: ReportRenderer,
    backend: Arc<dyn PdfBackend>,
    capturing: BusyFlag,
    settle_delay: Duration,
}

impl DocumentService {
    pub fn new(
        renderer: ReportRenderer,
        backend: Arc<dyn PdfBackend>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            renderer,
            backend,
            capturing: BusyFlag::new(),
            settle_delay,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.is_set()
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::from_capturing(self.is_capturing())
    }

    /// Render `record` in whichever mode is current.
    pub fn preview(&self, record: &ReportRecord) -> RenderedDocument {
        self.renderer.render(record, self.mode())
    }

    /// Capture the current record.
    ///
    /// Waits for the settle delay after entering capture mode, then renders
    /// the record as it is at that moment. The flag is cleared on every exit.
    pub async fn capture(
        &self,
        store: &RecordStore,
        format: OutputFormat,
    ) -> Result<GeneratedDocument, DocumentError> {
        let _guard = self
            .capturing
            .try_acquire()
            .ok_or(DocumentError::CaptureInProgress)?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let record = store.snapshot();
        let document = self.renderer.render(&record, RenderMode::Capture);
        let backend = self.backend.clone();

        let bytes = tokio::task::spawn_blocking(move || backend.compile(&document, format))
            .await
            .map_err(|e| DocumentError::Join(e.to_string()))??;

        let filename = output_filename(&record, format.extension());
        log::info!("Captured report as {} ({} bytes)", filename, bytes.len());

        Ok(GeneratedDocument {
            filename,
            bytes,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchoolProfile;
    use crate::report::template::initial_record;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        fail: bool,
        sources: Mutex<Vec<String>>,
    }

    impl PdfBackend for RecordingBackend {
        fn compile(
            &self,
            document: &RenderedDocument,
            _format: OutputFormat,
        ) -> Result<Vec<u8>, DocumentError> {
            self.sources.lock().push(document.source.clone());
            if self.fail {
                Err(DocumentError::TypstExit(1))
            } else {
                Ok(b"%PDF-1.7".to_vec())
            }
        }
    }

    fn service(backend: Arc<RecordingBackend>, delay_ms: u64) -> DocumentService {
        let renderer = ReportRenderer::with_template(
            String::new(),
            SchoolProfile::default(),
            CaptureOptions::default(),
        );
        DocumentService::new(renderer, backend, Duration::from_millis(delay_ms))
    }

    #[tokio::test]
    async fn test_capture_returns_named_pdf() {
        let backend = Arc::new(RecordingBackend::default());
        let service = service(backend.clone(), 0);
        let store = RecordStore::new(initial_record());

        let doc = service.capture(&store, OutputFormat::Pdf).await.unwrap();
        assert_eq!(doc.filename, "Rapor_Muhammad_Fatih_Al-Farisi_Ganjil.pdf");
        assert_eq!(doc.bytes, b"%PDF-1.7".to_vec());
        assert!(!service.is_capturing());

        let sources = backend.sources.lock();
        assert_eq!(sources.len(), 1);
        assert!(!sources[0].contains("Tambah Baris"));
    }

    #[tokio::test]
    async fn test_failed_capture_releases_flag() {
        let backend = Arc::new(RecordingBackend {
            fail: true,
            ..Default::default()
        });
        let service = service(backend, 0);
        let store = RecordStore::new(initial_record());

        let result = service.capture(&store, OutputFormat::Pdf).await;
        assert!(matches!(result, Err(DocumentError::TypstExit(1))));
        assert!(!service.is_capturing());
        assert_eq!(service.mode(), RenderMode::Edit);
    }

    #[tokio::test]
    async fn test_overlapping_capture_is_refused() {
        let backend = Arc::new(RecordingBackend::default());
        let service = service(backend.clone(), 50);
        let store = RecordStore::new(initial_record());

        let (first, second) = tokio::join!(
            service.capture(&store, OutputFormat::Pdf),
            service.capture(&store, OutputFormat::Pdf)
        );
        assert!(first.is_ok());
        assert!(matches!(second, Err(DocumentError::CaptureInProgress)));
        assert_eq!(backend.sources.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_capture_sees_edits_made_during_settle_delay() {
        let backend = Arc::new(RecordingBackend::default());
        let service = service(backend.clone(), 50);
        let store = RecordStore::new(initial_record());

        let edit = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(service.mode(), RenderMode::Capture);
            store.update(|r| r.with_narrative("Ananda tumbuh ceria.".to_string()));
        };
        let (doc, _) = tokio::join!(service.capture(&store, OutputFormat::Pdf), edit);

        assert!(doc.is_ok());
        assert!(backend.sources.lock()[0].contains("Ananda tumbuh ceria."));
    }
}
