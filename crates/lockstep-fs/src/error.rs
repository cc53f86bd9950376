//! Error types for lockstep-fs

use std::path::PathBuf;

/// Result type for lockstep-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lockstep-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse state file at {path}: {message}")]
    StateParse { path: PathBuf, message: String },

    #[error("Failed to serialize state for {path}: {message}")]
    StateSerialize { path: PathBuf, message: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
