//! PDF Processor
//!
//! Structured (embedded text layer) extraction from PDF documents.

use std::panic::{self, AssertUnwindSafe};

use chemsure_utils::{ChemsureError, ChemsureResult};
use tracing::debug;

/// Structured text extraction backend.
pub trait TextExtractor: Send + Sync {
    /// Text of each page in order. A page without text yields an empty string.
    fn extract_pages(&self, data: &[u8]) -> ChemsureResult<Vec<String>>;
}

/// Text-layer extraction via pdf-extract
#[derive(Debug, Clone, Default)]
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfProcessor {
    fn extract_pages(&self, data: &[u8]) -> ChemsureResult<Vec<String>> {
        // pdf-extract panics on some malformed fonts and encodings
        let pages = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem_by_pages(data)))
            .map_err(|_| ChemsureError::extraction_failed("PDF text extraction panicked"))?
            .map_err(|e| ChemsureError::extraction_failed(format!("Failed to extract text from PDF: {}", e)))?;

        let chars: usize = pages.iter().map(String::len).sum();
        debug!(pages = pages.len(), chars, "Structured text extracted");
        Ok(pages)
    }
}
