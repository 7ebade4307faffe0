pub mod bio;
pub mod cli;
pub mod core;
pub mod formats;
pub mod report;
pub mod utils;

pub use crate::bio::annotation::{SourceTool, TermRecord, TermType};
pub use crate::core::{
    aggregator::{aggregate, PerGeneRow},
    consensus::{consensus, filter_per_term, thresholds, ThresholdTable},
    overlap::{compute_overlaps, OverlapResult},
};
pub use crate::formats::{parse, Dialect, ParseOutput};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntegratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<csv::Error> for IntegratorError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return IntegratorError::Parse(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => IntegratorError::Io(e),
            kind => IntegratorError::Parse(format!("{:?}", kind)),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntegratorError>;
