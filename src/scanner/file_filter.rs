use crate::scanner::task::{DocumentFormat, FileTask};
use std::fs;
use std::io;
use std::path::Path;

/// Outcome of checking one regular file against the eligibility rules.
#[derive(Debug)]
pub enum FilterDecision {
    Eligible(FileTask),
    /// Not a supported extension. Silently ignored.
    Unsupported,
    /// Supported extension but the file cannot be opened for reading.
    Unreadable(io::Error),
}

pub struct FileFilter {
    formats: Vec<DocumentFormat>,
}

impl FileFilter {
    pub fn new() -> Self {
        Self {
            formats: DocumentFormat::ALL.to_vec(),
        }
    }

    pub fn format_of(&self, path: &Path) -> Option<DocumentFormat> {
        DocumentFormat::from_path(path).filter(|format| self.formats.contains(format))
    }

    pub fn is_document_file(&self, path: &Path) -> bool {
        self.format_of(path).is_some()
    }

    pub fn classify(&self, path: &Path) -> FilterDecision {
        let Some(format) = self.format_of(path) else {
            return FilterDecision::Unsupported;
        };

        match check_readable(path) {
            Ok(()) => FilterDecision::Eligible(FileTask::new(path.to_path_buf(), format)),
            Err(e) => FilterDecision::Unreadable(e),
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn check_readable(path: &Path) -> io::Result<()> {
    fs::File::open(path).map(drop)
}
