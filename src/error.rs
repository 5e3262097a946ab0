//! Error types for ziptozim-client
//!
//! Domain errors for the submission workflow. Failures that come back from
//! the conversion service are not represented here; those are user-facing
//! [`ServerFailure`](crate::types::ServerFailure) values held by the state
//! machine. This module covers the crate's own contract and I/O failures.

use crate::types::SubmissionStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ziptozim-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ziptozim-client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "endpoint")
        key: Option<String>,
    },

    /// Operation attempted in a status that does not permit it
    #[error("cannot {operation} while {status:?}")]
    InvalidState {
        /// The operation that was attempted (e.g., "deliver")
        operation: String,
        /// The status that prevents the operation
        status: SubmissionStatus,
    },

    /// Artifact delivery failed
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error from the underlying HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Artifact delivery errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Destination file exists and the collision policy forbids replacing it
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: PathBuf,
        /// Why the collision could not be resolved
        reason: String,
    },

    /// A path could not be used as a delivery destination
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// The offending path
        path: PathBuf,
        /// Why the path is unusable
        reason: String,
    },

    /// Writing the staged artifact failed
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        /// The staging path being written
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Promoting the staged artifact to its final name failed
    #[error("failed to promote {staging} to {dest}: {source}")]
    PromoteFailed {
        /// The staging path
        staging: PathBuf,
        /// The intended final path
        dest: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl Error {
    /// Create a configuration error for a specific key.
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
