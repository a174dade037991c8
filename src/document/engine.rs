//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source and its assets to a
//! temporary directory, invoking the compiler, and reading back the output.

use std::fs;
use std::process::Command;
use tempfile::tempdir;
use tempfile::TempDir;

use super::render::RenderedDocument;
use super::traits::PdfBackend;
use super::{DocumentError, OutputFormat};

const SOURCE_FILE: &str = "rapor.typ";
const DEFAULT_BINARY: &str = "typst";
/// Typst's base resolution; the capture scale factor multiplies it.
const BASE_PPI: f32 = 72.0;

/// Engine for compiling rendered reports with the Typst CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    binary: String,
    scale: f32,
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY, 2.0)
    }
}

impl TypstRenderEngine {
    /// # Arguments
    /// * `binary` - Typst executable name or path.
    /// * `scale` - Raster scale factor used for PNG output.
    pub fn new(binary: impl Into<String>, scale: f32) -> Self {
        Self {
            binary: binary.into(),
            scale,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn ppi(&self) -> f32 {
        BASE_PPI * self.scale
    }

    /// Write the source and assets into a fresh scratch directory.
    fn prepare(&self, document: &RenderedDocument) -> Result<TempDir, DocumentError> {
        let temp_dir = tempdir().map_err(DocumentError::TempDir)?;
        fs::write(temp_dir.path().join(SOURCE_FILE), &document.source)
            .map_err(DocumentError::WriteTypst)?;

        for asset in &document.assets {
            fs::write(temp_dir.path().join(&asset.name), &asset.bytes).map_err(|source| {
                DocumentError::WriteAsset {
                    name: asset.name.clone(),
                    source,
                }
            })?;
        }

        Ok(temp_dir)
    }

    fn run_compiler(
        &self,
        temp_dir: &TempDir,
        format: OutputFormat,
    ) -> Result<Vec<u8>, DocumentError> {
        let mut command = Command::new(&self.binary);
        command.arg("compile").arg(SOURCE_FILE);

        let output_path = match format {
            OutputFormat::Pdf => {
                command.arg("output.pdf");
                temp_dir.path().join("output.pdf")
            }
            OutputFormat::Png => {
                command
                    .arg("page-{p}.png")
                    .arg("--ppi")
                    .arg(format!("{}", self.ppi()));
                temp_dir.path().join("page-1.png")
            }
        };

        log::debug!("running {} for {:?} output", self.binary, format);

        let status = command
            .current_dir(temp_dir.path())
            .status()
            .map_err(DocumentError::TypstIo)?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            return Err(DocumentError::TypstExit(code));
        }

        fs::read(&output_path).map_err(DocumentError::ReadOutput)
    }
}

impl PdfBackend for TypstRenderEngine {
    fn compile(
        &self,
        document: &RenderedDocument,
        format: OutputFormat,
    ) -> Result<Vec<u8>, DocumentError> {
        let temp_dir = self.prepare(document)?;
        self.run_compiler(&temp_dir, format)
    }
}
