//! MSDS Scanner
//!
//! Runs the full document pipeline: text acquisition, section narrowing,
//! identifier extraction and matching against the reference list.

use std::io::{Read, Seek};

use chemsure_models::ReferenceLookup;
use chemsure_utils::{ChemsureError, ChemsureResult, ScannerConfig};
use serde::Serialize;
use tracing::{info, warn};

use crate::acquisition::{FallbackReason, TextAcquisition, TextSource};
use crate::document::MsdsDocument;
use crate::extraction::extract_candidates;
use crate::matcher::{match_candidates, MatchedSubstance};
use crate::section::locate_section;

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub matches: Vec<MatchedSubstance>,
    pub text_source: TextSource,
    pub fallback_reason: Option<FallbackReason>,
    pub section_located: bool,
    pub candidate_count: usize,
}

impl ScanReport {
    fn empty(text_source: TextSource, fallback_reason: Option<FallbackReason>) -> Self {
        Self {
            matches: Vec::new(),
            text_source,
            fallback_reason,
            section_located: false,
            candidate_count: 0,
        }
    }
}

#[derive(Clone)]
pub struct MsdsScanner {
    acquisition: TextAcquisition,
}

impl MsdsScanner {
    pub fn new(acquisition: TextAcquisition) -> Self {
        Self { acquisition }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(TextAcquisition::from_config(config))
    }

    /// Scan a validated document for listed substances.
    ///
    /// Blocking: OCR shells out and may take seconds per page.
    ///
    /// Returns `ExtractionFailed` only when the text layer could not be read
    /// and OCR produced no text.
    pub fn scan_document<L>(&self, document: &MsdsDocument, lookup: &L) -> ChemsureResult<ScanReport>
    where
        L: ReferenceLookup + ?Sized,
    {
        // Refuse before paying for extraction or OCR.
        lookup.ensure_loaded()?;

        info!(filename = document.filename(), bytes = document.data().len(), "Scanning MSDS document");
        let acquired = self.acquisition.acquire(document.data())?;

        if acquired.text.trim().is_empty() {
            // An unreadable text layer only becomes the caller's problem when OCR found nothing either.
            if let Some(FallbackReason::ExtractionFailed(message)) = &acquired.fallback_reason {
                warn!(filename = document.filename(), error = %message, "Text layer unreadable and OCR found no text");
                return Err(ChemsureError::extraction_failed(message.clone()));
            }
            warn!(filename = document.filename(), "No searchable text found in PDF even after OCR");
            return Ok(ScanReport::empty(acquired.source, acquired.fallback_reason));
        }

        let section = locate_section(&acquired.text);
        let candidates = extract_candidates(section.text);
        let matches = match_candidates(&candidates, lookup)?;

        info!(
            filename = document.filename(),
            text_source = %acquired.source,
            candidates = candidates.len(),
            matches = matches.len(),
            "MSDS scan complete"
        );

        Ok(ScanReport {
            matches,
            text_source: acquired.source,
            fallback_reason: acquired.fallback_reason,
            section_located: section.located,
            candidate_count: candidates.len(),
        })
    }

    /// Read a document from a seekable stream and scan it.
    pub fn scan_reader<R, L>(&self, filename: &str, reader: R, lookup: &L) -> ChemsureResult<ScanReport>
    where
        R: Read + Seek,
        L: ReferenceLookup + ?Sized,
    {
        let document = MsdsDocument::from_reader(filename, reader)?;
        self.scan_document(&document, lookup)
    }
}
