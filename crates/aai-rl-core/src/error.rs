//! Error types for the RL core library

use thiserror::Error;

/// Core error type for agent and environment operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Agent-related errors
    #[error("Agent error: {0}")]
    Agent(String),

    /// Unknown distribution tag or unusable distribution parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A numeric precondition was violated (probability range, bias vector, ray count)
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length the caller required
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// A rejection-sampling loop gave up without producing a usable draw
    #[error("Sampler exhausted after {attempts} draws without a usable value")]
    SamplerExhausted {
        /// Draws made before giving up
        attempts: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RL operations
pub type Result<T> = std::result::Result<T, RLError>;
