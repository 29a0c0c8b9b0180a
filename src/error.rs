use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErdrawError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse diagram: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown cardinality '{0}' (expected one of 1, 0..1, 1..n, 0..n)")]
    UnknownCardinality(String),

    #[error("Theme error: {0}")]
    Theme(String),

    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, ErdrawError>;
