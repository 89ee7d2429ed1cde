use crate::pipeline::RunCounters;
use crate::ui::format_elapsed;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocPagesError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Worker pool is no longer accepting documents")]
    PoolClosed,

    #[error("Background task failed: {message}")]
    TaskFailed { message: String },

    /// The pool made no progress within the drain bound, either while
    /// draining or while the walk waited on a full queue.
    #[error("Workers did not finish within {seconds} seconds")]
    DrainTimeout {
        seconds: u64,
        counters: RunCounters,
        elapsed: Duration,
    },
}

/// Failure of a single document's page extraction.
///
/// These never leave the worker that produced them; they are folded into an
/// `ExtractionResult` and reported next to the file path.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parse error: {message}")]
    Pdf { message: String },

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("not a valid OOXML package: {message}")]
    Package { message: String },

    #[error("malformed package XML: {message}")]
    Xml { message: String },

    #[error("package part missing: {part}")]
    MissingPart { part: String },

    #[error("document properties do not declare a page count")]
    MissingPageCount,

    #[error("invalid page count value: {value}")]
    InvalidPageCount { value: String },

    #[error("extractor panicked: {message}")]
    Panicked { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for DocPagesError {
    fn user_message(&self) -> String {
        match self {
            DocPagesError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            DocPagesError::PoolClosed => {
                "Worker pool stopped accepting documents before the scan finished".to_string()
            }
            DocPagesError::TaskFailed { message } => {
                format!("Background task failed: {}", message)
            }
            DocPagesError::DrainTimeout {
                seconds,
                counters,
                elapsed,
            } => {
                format!(
                    "Timed out after {} seconds waiting for workers ({} of {} documents finished, {} pages counted in {}; totals are incomplete)",
                    seconds,
                    counters.completed(),
                    counters.documents_submitted,
                    counters.pages_total,
                    format_elapsed(*elapsed)
                )
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            DocPagesError::Config { .. } => Some(
                "Check the syntax of docpages.toml (or the file named by DOCPAGES_CONFIG).".to_string(),
            ),
            DocPagesError::DrainTimeout { .. } => Some(
                "A document may be stalling its parser. Raise run.drain_timeout_secs or remove the offending file.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DocPagesError {
    fn from(error: toml::de::Error) -> Self {
        DocPagesError::Config {
            message: error.to_string(),
        }
    }
}

impl From<lopdf::Error> for ExtractionError {
    fn from(error: lopdf::Error) -> Self {
        ExtractionError::Pdf {
            message: error.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::Io(e) => ExtractionError::Io(e),
            zip::result::ZipError::FileNotFound => ExtractionError::MissingPart {
                part: "requested part".to_string(),
            },
            other => ExtractionError::Package {
                message: other.to_string(),
            },
        }
    }
}

impl From<quick_xml::Error> for ExtractionError {
    fn from(error: quick_xml::Error) -> Self {
        ExtractionError::Xml {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocPagesError>;
