use crate::error::Result;
use crate::scanner::file_filter::{FileFilter, FilterDecision};
use crate::scanner::task::{DocumentFormat, FileTask};
use crate::ui::{GracefulShutdown, OutputFormatter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// Receiver of dispatched tasks.
///
/// `submit` must either accept the task for processing and count it, or
/// return an error having done neither.
pub trait TaskSink {
    fn submit(&self, task: FileTask) -> Result<()>;
}

/// Walks a directory tree and turns eligible files into [`FileTask`]s.
pub struct DocumentScanner {
    filter: FileFilter,
    output: Arc<OutputFormatter>,
    shutdown: Option<GracefulShutdown>,
}

impl DocumentScanner {
    pub fn new(output: Arc<OutputFormatter>) -> Self {
        Self {
            filter: FileFilter::new(),
            output,
            shutdown: None,
        }
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Lazy, single-pass sequence of tasks under `root`.
    ///
    /// `root` may be a directory or a single file. A missing or unreadable
    /// root produces one warning and no tasks.
    pub fn walk<P: AsRef<Path>>(&self, root: P) -> TaskWalk<'_> {
        let entries = WalkDir::new(root.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        TaskWalk {
            entries,
            scanner: self,
            stats: ScanStatistics::default(),
        }
    }

    /// Walks `root` and submits every eligible file to `sink`.
    ///
    /// Per-entry failures are logged and skipped. Only a sink refusing a task
    /// stops the walk with an error.
    pub fn dispatch<P, S>(&self, root: P, sink: &S) -> Result<ScanStatistics>
    where
        P: AsRef<Path>,
        S: TaskSink + ?Sized,
    {
        let mut walk = self.walk(root);
        let mut dispatched = 0;
        let mut interrupted = false;

        loop {
            if !self.is_running() {
                interrupted = true;
                break;
            }

            let Some(task) = walk.next() else {
                break;
            };

            sink.submit(task)?;
            dispatched += 1;
        }

        let mut stats = walk.into_statistics();
        stats.tasks_dispatched = dispatched;
        stats.interrupted = interrupted;

        Ok(stats)
    }

    fn is_running(&self) -> bool {
        self.shutdown.as_ref().map_or(true, |s| s.is_running())
    }

    fn warn(&self, path: &Path, error: &str) {
        self.output.walk_warning(path, error);
    }
}

pub struct TaskWalk<'a> {
    entries: walkdir::IntoIter,
    scanner: &'a DocumentScanner,
    stats: ScanStatistics,
}

impl TaskWalk<'_> {
    pub fn statistics(&self) -> &ScanStatistics {
        &self.stats
    }

    pub fn into_statistics(self) -> ScanStatistics {
        self.stats
    }

    fn visit(&mut self, entry: &DirEntry) -> Option<FileTask> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            // Links are not followed into directories, but a link to a
            // regular file counts as that file.
            match fs::metadata(path) {
                Ok(metadata) if metadata.is_file() => {}
                Ok(_) => return None,
                Err(e) => {
                    self.record_warning(path, &e.to_string());
                    return None;
                }
            }
        } else if !file_type.is_file() {
            return None;
        }

        match self.scanner.filter.classify(path) {
            FilterDecision::Eligible(task) => Some(task),
            FilterDecision::Unsupported => None,
            FilterDecision::Unreadable(e) => {
                self.record_warning(path, &e.to_string());
                None
            }
        }
    }

    fn record_warning(&mut self, path: &Path, error: &str) {
        self.stats.warnings += 1;
        self.scanner.warn(path, error);
    }
}

impl Iterator for TaskWalk<'_> {
    type Item = FileTask;

    fn next(&mut self) -> Option<FileTask> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    let description = err
                        .io_error()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| err.to_string());
                    self.record_warning(&path, &description);
                    continue;
                }
            };

            self.stats.entries_visited += 1;

            if let Some(task) = self.visit(&entry) {
                *self.stats.by_format.entry(task.format).or_insert(0) += 1;
                return Some(task);
            }
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStatistics {
    pub entries_visited: usize,
    pub tasks_dispatched: usize,
    pub warnings: usize,
    pub by_format: BTreeMap<DocumentFormat, usize>,
    pub interrupted: bool,
}

impl ScanStatistics {
    pub fn tasks_found(&self) -> usize {
        self.by_format.values().sum()
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Entries visited: {}\n  Documents dispatched: {}\n  Warnings: {}\n",
            self.entries_visited, self.tasks_dispatched, self.warnings
        );

        if !self.by_format.is_empty() {
            summary.push_str("  Documents by type:\n");
            for (format, count) in &self.by_format {
                summary.push_str(&format!("    {}: {} files\n", format, count));
            }
        }

        if self.interrupted {
            summary.push_str("  Walk interrupted before completion\n");
        }

        summary
    }
}

/// Resolves the root for display, falling back to the path as given.
pub fn display_root(root: &Path) -> PathBuf {
    fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
}
