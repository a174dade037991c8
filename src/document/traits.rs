//! Seam between the capture flow and the external document compiler.

use super::render::RenderedDocument;
use super::{DocumentError, OutputFormat};

/// Turns rendered Typst source into a finished file.
pub trait PdfBackend: Send + Sync {
    /// Compile the document; blocking, run it off the async executor.
    fn compile(
        &self,
        document: &RenderedDocument,
        format: OutputFormat,
    ) -> Result<Vec<u8>, DocumentError>;
}
