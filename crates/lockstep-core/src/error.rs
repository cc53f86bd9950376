//! Error types for lockstep-core

/// Result type for lockstep-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in lockstep-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external tool command exited unsuccessfully
    #[error("Command `{command}` failed (exit code {code}): {stderr}")]
    ToolFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// An external tool command produced output that could not be interpreted
    #[error("Unexpected output from `{command}`: {message}")]
    ToolOutput { command: String, message: String },

    /// A tool call was requested but no command is configured for it
    #[error("No command configured for {call}")]
    NotConfigured { call: String },

    /// An action name outside snapshot/restore/clean
    #[error("Unknown action: {name}")]
    UnknownAction { name: String },

    /// Configuration file could not be used
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// File watcher error
    #[error(transparent)]
    Watch(#[from] notify::Error),

    /// Filesystem error from lockstep-fs
    #[error(transparent)]
    Fs(#[from] lockstep_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
