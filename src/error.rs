// ⚠️ Error types for the casebook library
// Binaries wrap these in anyhow; the library keeps them typed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CasebookError {
    #[error("Unknown exhibit: {0} (expected Q1-Q6 or Exhibit 1-8)")]
    UnknownExhibit(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CasebookError>;
