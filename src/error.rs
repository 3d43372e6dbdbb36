// src/error.rs
// =============================================================================
// The single error type shared by the fetch, resolve and write layers.
//
// Every fault a census run can hit is one variant of CensusError. Callers
// that only care about the broad category use kind(), which returns an
// ErrorKind tag (this is what the collection processor looks at to decide
// between skipping a user and aborting the whole run).
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`CensusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (DNS, connect, timeout, ...)
    Network,
    /// The response body was not JSON
    Parse,
    /// The JSON was missing a key, or the key had the wrong shape
    MissingField,
    /// GitHub answered 403 or 429
    RateLimited,
    /// Bad user input, such as an unparseable repository reference
    InvalidInput,
    /// Reading or writing the output file failed
    Io,
}

#[derive(Debug, Error)]
pub enum CensusError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not valid JSON: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} has no '{field}' field")]
    MissingField { url: String, field: String },

    #[error("field '{field}' in response from {url} is not {expected}")]
    UnexpectedType {
        url: String,
        field: String,
        expected: &'static str,
    },

    #[error("rate limited by {url} (HTTP {status}){}", reset_hint(.reset))]
    RateLimited {
        url: String,
        status: u16,
        reset: Option<String>,
    },

    #[error("invalid repository '{input}': {reason}")]
    InvalidRepository { input: String, reason: String },

    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn reset_hint(reset: &Option<String>) -> String {
    match reset {
        Some(epoch) => format!(", resets at epoch {}", epoch),
        None => String::new(),
    }
}

impl CensusError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CensusError::Network { .. } => ErrorKind::Network,
            CensusError::Parse { .. } => ErrorKind::Parse,
            CensusError::MissingField { .. } | CensusError::UnexpectedType { .. } => {
                ErrorKind::MissingField
            }
            CensusError::RateLimited { .. } => ErrorKind::RateLimited,
            CensusError::InvalidRepository { .. } => ErrorKind::InvalidInput,
            CensusError::Io { .. } => ErrorKind::Io,
        }
    }

    /// True when retrying the next user is pointless because the API
    /// will refuse every further request too.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::RateLimited | ErrorKind::Io)
    }
}

pub type CensusResult<T> = Result<T, CensusError>;
