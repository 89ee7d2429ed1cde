use crate::error::{DocPagesError, UserFriendlyError};
use crate::extractor::ExtractionResult;
use crate::report::RunReport;
use console::{style, Emoji, Term};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static STOP: Emoji = Emoji("🛑 ", "! ");

/// Line-oriented output shared by the dispatcher, every worker and the
/// run controller.
///
/// Each message is written with a single `println!`, so lines from
/// concurrent workers never interleave mid-line.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // Per-document lines
    pub fn document_counted(&self, path: &Path, pages: u64) {
        if !self.should_show_message(1) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "document",
                "path": path.display().to_string(),
                "pages": pages,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            _ => self.info(&format!(">> {} >> Pages: {}", path.display(), pages)),
        }
    }

    pub fn document_failed(&self, path: &Path, error: &str) {
        if !self.should_show_message(1) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "document",
                "path": path.display().to_string(),
                "error": error,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            _ => self.warning(&format!(">> {} >> Error: {}", path.display(), error)),
        }
    }

    pub fn document_result(&self, result: &ExtractionResult) {
        match result {
            ExtractionResult::Counted { path, pages } => self.document_counted(path, *pages),
            ExtractionResult::Failed { path, error } => {
                self.document_failed(path, &error.to_string())
            }
        }
    }

    /// An entry the walk could not visit or classify.
    pub fn walk_warning(&self, path: &Path, error: &str) {
        if !self.should_show_message(1) {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "walk_warning",
                "path": path.display().to_string(),
                "error": error,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            _ => self.warning(&format!(">> {} >> Error: {}", path.display(), error)),
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &DocPagesError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Final totals. Printed even in quiet mode: the totals are the
    /// program's result, not progress chatter.
    pub fn print_run_summary(&self, report: &RunReport) {
        match self.mode {
            OutputMode::Human => self.print_human_summary(report),
            OutputMode::Json => {
                let json_output = serde_json::to_string_pretty(&serde_json::json!({
                    "type": "summary",
                    "report": report,
                }))
                .unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_summary(report),
        }
    }

    pub fn print_separator(&self) {
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {} // No separator in JSON mode
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, report: &RunReport) {
        println!();
        self.print_separator();

        let (headline, emoji) = if report.cancelled {
            ("Page count interrupted, totals cover submitted work only", STOP)
        } else {
            ("Page count completed!", CHECKMARK)
        };
        if self.use_colors {
            let headline = if report.cancelled {
                style(headline).yellow().bold()
            } else {
                style(headline).green().bold()
            };
            println!("{}{}", emoji, headline);
        } else {
            println!("{}", headline);
        }

        for line in summary_lines(report) {
            println!("{}", line);
        }

        self.print_separator();
    }

    fn print_plain_summary(&self, report: &RunReport) {
        if report.cancelled {
            println!("INTERRUPTED: Page count");
        } else {
            println!("COMPLETED: Page count");
        }
        for line in summary_lines(report) {
            println!("{}", line);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Warning,
    Info,
}

fn summary_lines(report: &RunReport) -> Vec<String> {
    let counters = &report.counters;
    let mut lines = vec![
        format!("Total number of documents: {}", counters.documents_submitted),
        format!("Total number of pages: {}", counters.pages_total),
        format!(
            "Total processing time: {}",
            format_elapsed(report.timing.elapsed)
        ),
    ];

    if counters.documents_failed > 0 {
        lines.push(format!("Failed documents: {}", counters.documents_failed));
    }

    lines
}

/// Formats a duration as `{h}h{mm}m{ss}s`, e.g. `1h02m05s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}h{:02}m{:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}
