//! Curriculum error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a curriculum
#[derive(Error, Debug)]
pub enum CurriculumError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A task file does not have the expected layout
    #[error("malformed task file {path}: {reason}")]
    MalformedTask {
        /// Offending file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// A partition into zero parts was requested
    #[error("cannot partition into {0} parts")]
    InvalidPartition(usize),
}

impl CurriculumError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result type for curriculum operations
pub type Result<T> = std::result::Result<T, CurriculumError>;
