//! Error types for pr-labeler

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can abort a labeling run
///
/// Every variant is fatal: the run has no retry or fallback path, because a
/// partially applied label update is worse than a clearly failed run.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid process or labeler configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A forge API call failed (unexpected status or transport failure)
    #[error("{command} failed: {message}")]
    Api {
        /// Identity of the failing command (method + URL)
        command: String,
        /// Underlying failure detail
        message: String,
    },

    /// A fetched payload was missing expected fields or malformed
    #[error("unexpected payload: {0}")]
    Data(String),

    /// A glob pattern could not be compiled
    #[error("invalid pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern as written in the config
        pattern: String,
        /// Why compilation failed
        message: String,
    },

    /// File I/O failure (event payload or local config file)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a forge API failure with the identity of the failing command
    pub fn api(command: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Api {
            command: command.into(),
            message: message.to_string(),
        }
    }
}
