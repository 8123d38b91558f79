//! Uploaded MSDS document.

use std::io::{Read, Seek, SeekFrom};

use chemsure_utils::{ChemsureError, ChemsureResult};

/// PDF signature must appear within this many leading bytes.
const PDF_HEADER_WINDOW: usize = 1024;

/// A validated PDF safety data sheet held in memory.
#[derive(Debug, Clone)]
pub struct MsdsDocument {
    filename: String,
    data: Vec<u8>,
}

impl MsdsDocument {
    /// Validate and wrap document bytes. Rejects anything that is not a PDF.
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> ChemsureResult<Self> {
        let filename = filename.into();
        let data = data.into();

        if filename.trim().is_empty() || !filename.to_lowercase().ends_with(".pdf") {
            return Err(ChemsureError::malformed_input(
                "Invalid file type. Only PDF files are allowed and a filename is required.",
            ));
        }
        if data.is_empty() {
            return Err(ChemsureError::malformed_input(format!("{} is empty", filename)));
        }

        let window = &data[..data.len().min(PDF_HEADER_WINDOW)];
        if !window.windows(5).any(|w| w == b"%PDF-") {
            return Err(ChemsureError::malformed_input(format!(
                "{} does not look like a PDF document",
                filename
            )));
        }

        Ok(Self { filename, data })
    }

    /// Read a whole document from a seekable source, starting at offset 0.
    pub fn from_reader<R: Read + Seek>(filename: impl Into<String>, mut reader: R) -> ChemsureResult<Self> {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| ChemsureError::malformed_input(format!("unreadable document: {}", e)))?;

        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| ChemsureError::malformed_input(format!("unreadable document: {}", e)))?;

        Self::new(filename, data)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_accepts_pdf() {
        let doc = MsdsDocument::new("sheet.PDF", b"%PDF-1.7\n...".to_vec()).unwrap();
        assert_eq!(doc.filename(), "sheet.PDF");
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let err = MsdsDocument::new("sheet.docx", b"%PDF-1.7".to_vec()).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_INPUT");
    }

    #[test]
    fn test_rejects_missing_filename() {
        assert!(MsdsDocument::new("", b"%PDF-1.7".to_vec()).is_err());
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        assert!(MsdsDocument::new("sheet.pdf", b"PK\x03\x04 zip".to_vec()).is_err());
        assert!(MsdsDocument::new("sheet.pdf", Vec::new()).is_err());
    }

    #[test]
    fn test_from_reader_rewinds() {
        let mut cursor = Cursor::new(b"%PDF-1.4 body".to_vec());
        cursor.seek(SeekFrom::End(0)).unwrap();

        let doc = MsdsDocument::from_reader("sheet.pdf", cursor).unwrap();
        assert_eq!(doc.data(), b"%PDF-1.4 body");
    }
}
