//! ChemSure Document Processing
//!
//! Scans material safety data sheets for substances on the GADSL
//! reference list. Text comes from the PDF text layer when it has one,
//! otherwise from OCR over rasterized pages.

pub mod acquisition;
pub mod document;
pub mod extraction;
pub mod matcher;
pub mod ocr;
pub mod pdf_processor;
pub mod preprocess;
pub mod scanner;
pub mod section;

pub use acquisition::{is_insufficient, AcquiredText, FallbackReason, TextAcquisition, TextSource};
pub use document::MsdsDocument;
pub use extraction::{extract_candidates, is_name_candidate};
pub use matcher::{match_candidates, MatchedSubstance};
pub use ocr::{PageRasterizer, PdftoppmRasterizer, TesseractRecognizer, TextRecognizer};
pub use pdf_processor::{PdfProcessor, TextExtractor};
pub use preprocess::ImagePreprocessor;
pub use scanner::{MsdsScanner, ScanReport};
pub use section::{locate_section, LocatedSection};
