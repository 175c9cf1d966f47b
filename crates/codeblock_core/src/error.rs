//! Error types for the code-block core.
use thiserror::Error;

/// Top-level error type for the code-block core.
#[derive(Error, Debug)]
pub enum CodeBlockError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidConfig { name: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
