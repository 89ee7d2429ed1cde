use crate::error::ExtractionError;
use crate::extractor::PageCounter;
use lopdf::Document;
use std::path::Path;

/// Counts pages by walking the PDF page tree.
///
/// Encrypted files are opened with the empty user password, which covers
/// documents that only carry an owner password.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPageCounter;

impl PageCounter for PdfPageCounter {
    fn count_pages(&self, path: &Path) -> Result<u64, ExtractionError> {
        let mut document = Document::load(path)?;

        if document.is_encrypted() && document.decrypt("").is_err() {
            return Err(ExtractionError::Encrypted);
        }

        Ok(document.get_pages().len() as u64)
    }
}
