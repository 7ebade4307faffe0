pub mod commands;
pub mod visualize;

use crate::core::config::{default_config, load_config, Config};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "annotation-integrator",
    version,
    about = "Normalize, compare and filter functional annotations from several tools",
    long_about = "Reads KofamScan, InterProScan, EggNOG (v5 and v7) and FANTASIA outputs, \
                  writes per-term and per-gene tables, filters FANTASIA predictions by a \
                  per-model score threshold and majority vote, and reports how much of a \
                  proteome each tool annotated."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// TOML configuration file (defaults are used when omitted)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert raw tool outputs into per-term and per-gene tables
    Normalize(commands::normalize::NormalizeArgs),

    /// Threshold and majority-vote filter FANTASIA predictions
    Filter(commands::filter::FilterArgs),

    /// Summarize annotation coverage and overlap between tools
    Analyze(commands::analyze::AnalyzeArgs),
}

/// Configuration from `--config`, or the built-in defaults
pub fn resolve_config(path: Option<&Path>) -> Result<Config, crate::IntegratorError> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            load_config(path)
        }
        None => Ok(default_config()),
    }
}
