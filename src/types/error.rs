//! Error types. None of these abort a request; callers degrade to the
//! deterministic baseline.

use thiserror::Error;

/// Failure reading a startup table
#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("table file not found: {0}")]
    Missing(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of the optional text-polish collaborator
#[derive(Debug, Error)]
pub enum PolishError {
    #[error("polish not configured")]
    Unconfigured,

    #[error("missing API credential")]
    MissingCredential,

    #[error("polish request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed polish response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for PolishError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PolishError::Timeout
        } else {
            PolishError::Transport(e.to_string())
        }
    }
}

/// Failure persisting the narrative cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
