pub mod docx;
pub mod pdf;

pub use docx::DocxPageCounter;
pub use pdf::PdfPageCounter;

use crate::error::ExtractionError;
use crate::scanner::{DocumentFormat, FileTask};
use std::path::{Path, PathBuf};

/// Format-specific page counting.
pub trait PageCounter: Send + Sync {
    fn count_pages(&self, path: &Path) -> Result<u64, ExtractionError>;
}

/// Outcome of processing one [`FileTask`].
#[derive(Debug)]
pub enum ExtractionResult {
    Counted { path: PathBuf, pages: u64 },
    Failed { path: PathBuf, error: ExtractionError },
}

impl ExtractionResult {
    pub fn path(&self) -> &Path {
        match self {
            ExtractionResult::Counted { path, .. } | ExtractionResult::Failed { path, .. } => path,
        }
    }

    pub fn pages(&self) -> Option<u64> {
        match self {
            ExtractionResult::Counted { pages, .. } => Some(*pages),
            ExtractionResult::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Counted { .. })
    }
}

/// One page counter per supported format.
pub struct ExtractorSet {
    pdf: Box<dyn PageCounter>,
    docx: Box<dyn PageCounter>,
}

impl ExtractorSet {
    pub fn new(pdf: Box<dyn PageCounter>, docx: Box<dyn PageCounter>) -> Self {
        Self { pdf, docx }
    }

    pub fn counter_for(&self, format: DocumentFormat) -> &dyn PageCounter {
        match format {
            DocumentFormat::Pdf => self.pdf.as_ref(),
            DocumentFormat::Docx => self.docx.as_ref(),
        }
    }

    pub fn extract(&self, task: FileTask) -> ExtractionResult {
        match self.counter_for(task.format).count_pages(&task.path) {
            Ok(pages) => ExtractionResult::Counted {
                path: task.path,
                pages,
            },
            Err(error) => ExtractionResult::Failed {
                path: task.path,
                error,
            },
        }
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::new(Box::new(PdfPageCounter), Box::new(DocxPageCounter))
    }
}
