//! Error types for repository client operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during repository client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, request/response I/O).
    #[error("Transport error calling {url}: {source}")]
    Transport {
        /// URL of the failed call.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP response from the repository server.
    #[error("HTTP error from repository server: {status} - {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// Request rejected before any network call was issued.
    #[error("Validation error: {message}")]
    Validation {
        /// Reason the request was rejected.
        message: String,
    },

    /// Required metadata is absent on the server.
    #[error("Not found: {what}")]
    NotFound {
        /// Description of the missing entity.
        what: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {source}")]
    Json {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error at {path}: {source}")]
    Io {
        /// File path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Container registry service failure (ECR).
    #[error("Container registry error: {message}")]
    Registry {
        /// Formatted service error.
        message: String,
    },
}

impl ClientError {
    /// Creates a validation error from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error from a description.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Creates a container registry error from a service failure.
    pub fn registry(err: impl std::fmt::Display) -> Self {
        Self::Registry {
            message: err.to_string(),
        }
    }

    /// Creates a file I/O error carrying the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        Self::Transport { url, source: err }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json { source: err }
    }
}
