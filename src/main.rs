use clap::Parser;
use docpages::{
    Cli, DocPages, DocPagesError, OutputFormatter, OutputMode, RunReport, INTERRUPTED_EXIT_CODE,
};
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Missing path prints usage and exits 2 inside clap
    let cli = Cli::parse();

    let docpages = match DocPages::from_cli(&cli) {
        Ok(docpages) => docpages,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    match docpages.count_pages(&cli.path).await {
        Ok(report) => exit_code_for_report(&report),
        Err(e) => {
            docpages.handle_error(&e);
            exit_code_for_error(&e)
        }
    }
}

/// Per-document failures do not affect the exit code.
fn exit_code_for_report(report: &RunReport) -> i32 {
    if report.cancelled {
        INTERRUPTED_EXIT_CODE
    } else {
        0
    }
}

fn exit_code_for_error(error: &DocPagesError) -> i32 {
    match error {
        DocPagesError::DrainTimeout { .. } => 9,
        _ => 1, // General error
    }
}

fn print_startup_error(error: &DocPagesError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
