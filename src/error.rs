//! Error types for catalog operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while managing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A field that must be a string held some other kind of value.
    #[error("{field} must be a string")]
    InvalidType {
        /// Name of the offending field
        field: &'static str,
    },

    /// The publication year is missing, not an integer, or not positive.
    #[error("year must be a positive integer, got {0}")]
    InvalidYear(String),

    /// The requested status is not one of the known values.
    #[error("unknown status {0:?}, expected \"available\" or \"checked_out\"")]
    InvalidStatus(String),

    /// Every id up to `u64::MAX` is taken.
    #[error("no book ids left to assign")]
    IdSpaceExhausted,

    /// The catalog file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path of the catalog file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The catalog file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path of the catalog file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The records could not be encoded as JSON.
    #[error("failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    /// Reading from or writing to the console failed.
    #[error("console I/O error: {0}")]
    Console(#[from] io::Error),
}

impl CatalogError {
    /// Whether this error comes from rejected user input rather than the
    /// environment. Input errors are reported and the operation is dropped;
    /// everything else ends the session.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::InvalidYear(_) | Self::InvalidStatus(_))
    }
}
