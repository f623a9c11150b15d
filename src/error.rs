// Error types for the analysis core.
//
// Algorithm modules return ProximityError so callers can tell a missing
// input (skip this mode) apart from a bad parameter. The CLI and pipeline
// wrap these in anyhow with file context.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProximityError {
    #[error("Input table not found: {0}")]
    MissingInput(PathBuf),

    #[error("Invalid word table: {0}")]
    InvalidTable(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProximityError>;
