//! Document module - renders the report to Typst and captures it as PDF.
//!
//! - `render` - maps the record to Typst source (edit or capture mode)
//! - `engine` - runs the Typst compiler in a scratch directory
//! - `capture` - the guarded capture flow behind the PDF endpoint
//! - `worker` - keeps the edit-mode preview current

pub mod capture;
pub mod common;
pub mod engine;
pub mod render;
pub mod routes;
pub mod traits;
pub mod worker;

pub use capture::{CaptureOptions, DocumentService, PageMargins};
pub use engine::TypstRenderEngine;
pub use render::{RenderMode, RenderedDocument, ReportRenderer};
pub use traits::PdfBackend;

use thiserror::Error;

/// Errors that can occur while rendering or capturing the report.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to load Typst template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("failed to write asset '{name}': {source}")]
    WriteAsset {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated output: {0}")]
    ReadOutput(#[source] std::io::Error),
    #[error("capture task failed: {0}")]
    Join(String),
    #[error("a capture is already in progress")]
    CaptureInProgress,
}

/// Output format of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    /// First page as PNG, rasterized at the capture scale factor
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Result of a successful capture.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}
