//! Result store error types

use thiserror::Error;

/// Result store errors
#[derive(Error, Debug)]
pub enum ResultsError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or invalid connection settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Table or column name that is not a plain identifier
    #[error("Invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Record that cannot be inserted
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Lookup matched no row
    #[error("No {column} found in {table}")]
    NotFound {
        /// Table searched
        table: String,
        /// Column requested
        column: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the result store
pub type Result<T> = std::result::Result<T, ResultsError>;
