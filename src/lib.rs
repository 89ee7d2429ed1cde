pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod ui;

#[cfg(test)]
mod test_support;

// Public API re-exports
pub use cli::Cli;
pub use config::{Config, OutputConfig, RunConfig};
pub use error::{DocPagesError, ExtractionError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{ExtractionResult, ExtractorSet, PageCounter};
pub use pipeline::{Aggregator, RunCounters, WorkerPool, WORKER_POOL_SIZE};
pub use report::{RunClock, RunReport, RunTiming};
pub use scanner::{DocumentFormat, DocumentScanner, FileTask, ScanStatistics};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, INTERRUPTED_EXIT_CODE};

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::task;

/// Stages of a run, in order. A run never goes back to an earlier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Dispatching,
    Draining,
    Reported,
}

impl RunPhase {
    pub fn next(self) -> Option<RunPhase> {
        match self {
            RunPhase::Init => Some(RunPhase::Dispatching),
            RunPhase::Dispatching => Some(RunPhase::Draining),
            RunPhase::Draining => Some(RunPhase::Reported),
            RunPhase::Reported => None,
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::Dispatching => "dispatching",
            RunPhase::Draining => "draining",
            RunPhase::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Main library interface for DocPages functionality
pub struct DocPages {
    config: Config,
    output_formatter: Arc<OutputFormatter>,
    shutdown: GracefulShutdown,
    extractors: Arc<ExtractorSet>,
}

impl DocPages {
    /// Create a new DocPages instance and install the Ctrl+C handler
    pub fn new(config: Config) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, shutdown))
    }

    /// Create a new DocPages instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config) -> Self {
        Self::with_shutdown(config, GracefulShutdown::new_for_test())
    }

    fn with_shutdown(config: Config, shutdown: GracefulShutdown) -> Self {
        let output_formatter = Arc::new(OutputFormatter::new(
            config.output.format,
            config.output.verbose,
            config.output.quiet,
        ));

        Self {
            config,
            output_formatter,
            shutdown,
            extractors: Arc::new(ExtractorSet::default()),
        }
    }

    /// Create DocPages instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(config)
    }

    /// Replace the page counters used by the workers
    pub fn with_extractors(mut self, extractors: ExtractorSet) -> Self {
        self.extractors = Arc::new(extractors);
        self
    }

    /// Count documents and pages under `root` and print the summary.
    ///
    /// Per-file problems never fail the run. Errors are reserved for the pool
    /// itself breaking down or making no progress within the configured
    /// timeout, whether the walk is still feeding it or it is draining.
    pub async fn count_pages<P: AsRef<Path>>(&self, root: P) -> Result<RunReport> {
        let root = root.as_ref().to_path_buf();
        let mut phase = RunPhase::Init;

        self.output_formatter.info(&format!(
            "Path = {}",
            scanner::display_root(&root).display()
        ));

        let clock = RunClock::start();
        let aggregator = Arc::new(Aggregator::new());
        let pool = WorkerPool::start(
            self.extractors.clone(),
            aggregator.clone(),
            self.output_formatter.clone(),
        );

        phase = self.advance(phase);
        let scan = self.dispatch(&root, &pool).await?;
        self.output_formatter.debug(&scan.display_summary());

        phase = self.advance(phase);
        pool.drain(self.config.drain_timeout()).await?;

        let timing = clock.finish();
        let counters = aggregator.snapshot();
        self.advance(phase);

        let report = RunReport {
            root,
            counters,
            timing,
            cancelled: scan.interrupted || !self.shutdown.is_running(),
            scan,
        };
        self.output_formatter.print_run_summary(&report);

        Ok(report)
    }

    /// Runs the walk on a blocking thread, feeding the pool as it goes.
    async fn dispatch(&self, root: &Path, pool: &WorkerPool) -> Result<ScanStatistics> {
        self.output_formatter
            .start_operation("Scanning for PDF and DOCX documents");

        let submitter = pool.submitter(self.config.drain_timeout())?;
        let scanner = DocumentScanner::new(self.output_formatter.clone())
            .with_shutdown(self.shutdown.clone());
        let root = root.to_path_buf();

        task::spawn_blocking(move || scanner.dispatch(&root, &submitter))
            .await
            .map_err(|e| DocPagesError::TaskFailed {
                message: format!("dispatcher stopped unexpectedly: {}", e),
            })?
    }

    fn advance(&self, from: RunPhase) -> RunPhase {
        let to = from.next().unwrap_or(from);
        self.output_formatter
            .debug(&format!("Run phase: {} -> {}", from, to));
        to
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &DocPagesError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
