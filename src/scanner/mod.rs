pub mod document_scanner;
pub mod file_filter;
pub mod task;

pub use document_scanner::{display_root, DocumentScanner, ScanStatistics, TaskSink, TaskWalk};
pub use file_filter::{FileFilter, FilterDecision};
pub use task::{DocumentFormat, FileTask};
