//! Text acquisition with OCR fallback.
//!
//! Structured extraction runs first. OCR runs only when that fails or
//! yields too little text to be a real text layer.

use std::fmt;
use std::sync::Arc;

use chemsure_utils::{ChemsureError, ChemsureResult, ScannerConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ocr::{backends_from_config, PageRasterizer, TextRecognizer};
use crate::pdf_processor::{PdfProcessor, TextExtractor};
use crate::preprocess::ImagePreprocessor;

pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;
pub const DEFAULT_OCR_DPI: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Structured,
    Ocr,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Ocr => write!(f, "ocr"),
        }
    }
}

/// Why structured extraction was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum FallbackReason {
    ExtractionFailed(String),
    InsufficientText { chars: usize },
}

#[derive(Debug, Clone)]
pub struct AcquiredText {
    pub text: String,
    pub source: TextSource,
    pub fallback_reason: Option<FallbackReason>,
}

/// True when extracted text is too short to trust as a text layer.
pub fn is_insufficient(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() < min_chars
}

#[derive(Clone)]
pub struct TextAcquisition {
    extractor: Arc<dyn TextExtractor>,
    rasterizer: Arc<dyn PageRasterizer>,
    recognizer: Arc<dyn TextRecognizer>,
    preprocessor: ImagePreprocessor,
    min_text_chars: usize,
    ocr_dpi: u32,
}

impl TextAcquisition {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        rasterizer: Arc<dyn PageRasterizer>,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            extractor,
            rasterizer,
            recognizer,
            preprocessor: ImagePreprocessor::default(),
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            ocr_dpi: DEFAULT_OCR_DPI,
        }
    }

    /// pdf-extract for the text layer, poppler and tesseract for OCR.
    pub fn from_config(config: &ScannerConfig) -> Self {
        let (rasterizer, recognizer) = backends_from_config(config);
        Self::new(
            Arc::new(PdfProcessor::new()),
            Arc::new(rasterizer),
            Arc::new(recognizer),
        )
        .with_min_text_chars(config.min_text_chars)
        .with_ocr_dpi(config.ocr_dpi)
        .with_preprocessor(ImagePreprocessor::new(config.contrast_factor))
    }

    pub fn with_min_text_chars(mut self, min_text_chars: usize) -> Self {
        self.min_text_chars = min_text_chars;
        self
    }

    pub fn with_ocr_dpi(mut self, ocr_dpi: u32) -> Self {
        self.ocr_dpi = ocr_dpi;
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Produce the document's plain text.
    ///
    /// Structured extraction errors are absorbed into the fallback. OCR
    /// backend errors are not: they propagate to the caller.
    pub fn acquire(&self, data: &[u8]) -> ChemsureResult<AcquiredText> {
        let reason = match self.extractor.extract_pages(data) {
            Ok(pages) => {
                let text = pages.join("\n");
                if !is_insufficient(&text, self.min_text_chars) {
                    debug!(chars = text.len(), "Using structured text layer");
                    return Ok(AcquiredText {
                        text,
                        source: TextSource::Structured,
                        fallback_reason: None,
                    });
                }
                let chars = text.trim().chars().count();
                info!(chars, min = self.min_text_chars, "Text layer too short, falling back to OCR");
                FallbackReason::InsufficientText { chars }
            }
            Err(e) => {
                warn!(error = %e, "Structured extraction failed, falling back to OCR");
                let detail = match e {
                    ChemsureError::ExtractionFailed { message } => message,
                    other => other.to_string(),
                };
                FallbackReason::ExtractionFailed(detail)
            }
        };

        let text = self.ocr(data)?;
        Ok(AcquiredText {
            text,
            source: TextSource::Ocr,
            fallback_reason: Some(reason),
        })
    }

    fn ocr(&self, data: &[u8]) -> ChemsureResult<String> {
        let pages = self.rasterizer.rasterize(data, self.ocr_dpi)?;

        let mut texts = Vec::with_capacity(pages.len());
        for (number, page) in pages.iter().enumerate() {
            let cleaned = self.preprocessor.preprocess(page);
            let text = self.recognizer.recognize(&cleaned)?;
            debug!(page = number + 1, chars = text.len(), "OCR page recognized");
            texts.push(text);
        }

        info!(pages = pages.len(), "OCR completed");
        Ok(texts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_threshold() {
        assert!(is_insufficient("", 50));
        assert!(is_insufficient(&format!("  {}  \n", "a".repeat(49)), 50));
        assert!(!is_insufficient(&"a".repeat(50), 50));
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        assert!(!is_insufficient("äöü", 3));
        assert!(is_insufficient("äöü", 4));
    }

    #[test]
    fn test_text_source_display() {
        assert_eq!(TextSource::Structured.to_string(), "structured");
        assert_eq!(TextSource::Ocr.to_string(), "ocr");
    }
}
