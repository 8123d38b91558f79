//! OCR backends.
//!
//! Rasterization and recognition both shell out to the poppler and
//! tesseract command line tools. Each sits behind a trait so the scanner
//! can be driven without either installed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use chemsure_utils::{ChemsureError, ChemsureResult, ScannerConfig};
use image::{DynamicImage, GrayImage};
use tracing::debug;

/// Renders every page of a PDF to an image.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, data: &[u8], dpi: u32) -> ChemsureResult<Vec<DynamicImage>>;
}

/// Recognizes text in a single page image.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, page: &GrayImage) -> ChemsureResult<String>;
}

#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, data: &[u8], dpi: u32) -> ChemsureResult<Vec<DynamicImage>> {
        let workdir = tempfile::tempdir().map_err(|e| ChemsureError::ocr_backend("pdftoppm", e.to_string()))?;
        let input = workdir.path().join("input.pdf");
        std::fs::write(&input, data).map_err(|e| ChemsureError::ocr_backend("pdftoppm", e.to_string()))?;

        let prefix = workdir.path().join("page");
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-r").arg(dpi.to_string()).arg("-png").arg(&input).arg(&prefix);
        run("pdftoppm", cmd)?;

        let pages = rendered_pages(workdir.path())?;
        debug!(pages = pages.len(), dpi, "Rasterized PDF pages");

        pages
            .iter()
            .map(|path| {
                image::open(path).map_err(|e| {
                    ChemsureError::ocr_backend("pdftoppm", format!("unreadable page image {}: {}", path.display(), e))
                })
            })
            .collect()
    }
}

/// Page images written by pdftoppm, in page order.
///
/// pdftoppm zero-pads page numbers to the width of the page count, so a
/// lexical sort is also a numeric one within a single run.
fn rendered_pages(dir: &Path) -> ChemsureResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ChemsureError::ocr_backend("pdftoppm", e.to_string()))?;

    let mut pages: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    pages.sort();
    Ok(pages)
}

#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, page: &GrayImage) -> ChemsureResult<String> {
        let workdir = tempfile::tempdir().map_err(|e| ChemsureError::ocr_backend("tesseract", e.to_string()))?;
        let image_path = workdir.path().join("page.png");
        page.save(&image_path)
            .map_err(|e| ChemsureError::ocr_backend("tesseract", format!("failed to stage page image: {}", e)))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg(&image_path).arg("stdout").arg("-l").arg(&self.language);
        let output = run("tesseract", cmd)?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Backends named in the scanner configuration.
pub fn backends_from_config(config: &ScannerConfig) -> (PdftoppmRasterizer, TesseractRecognizer) {
    (
        PdftoppmRasterizer::new(&config.pdftoppm_path),
        TesseractRecognizer::new(&config.tesseract_path, &config.tesseract_lang),
    )
}

fn run(backend: &str, mut cmd: Command) -> ChemsureResult<Output> {
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let output = cmd.output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ChemsureError::ocr_backend(backend, format!("{} is not installed or not on PATH", backend))
        } else {
            ChemsureError::ocr_backend(backend, format!("failed to start: {}", e))
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ChemsureError::ocr_backend(
            backend,
            format!("exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    Ok(output)
}
