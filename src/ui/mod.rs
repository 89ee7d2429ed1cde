pub mod output;
pub mod signals;

pub use output::{format_elapsed, OutputFormatter, OutputMode};
pub use signals::{GracefulShutdown, INTERRUPTED_EXIT_CODE};
