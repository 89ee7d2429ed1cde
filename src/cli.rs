use crate::config::{Config, CONFIG_ENV};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docpages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Count PDF and DOCX documents and their pages in a directory tree")]
#[command(
    long_about = "DocPages walks a directory tree, reads the page count of every .pdf and \
                  .docx file it finds and prints the total number of documents and pages."
)]
#[command(after_help = "EXAMPLES:\n  \
    docpages ~/Documents\n  \
    docpages /srv/archive/contracts\n\n\
    Settings are read from docpages.toml in the working directory, or from the \
    file named by DOCPAGES_CONFIG.")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory (or single document) to scan
    pub path: PathBuf,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = Config::load_with_defaults(explicit)?;
        config.validate()?;

        Ok(config)
    }
}
