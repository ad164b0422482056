//! Error types and result aliases for strata operations.
//!
//! Provides a unified error type covering every failure mode of a
//! configuration resolution with actionable error messages.

use thiserror::Error;

use crate::types::{ConfigFormat, Layer};

/// Unified error type for all strata operations
#[derive(Error, Debug)]
pub enum StrataError {
    /// A configured file path points at nothing on disk. Only raised for
    /// sources the caller explicitly configured; optional probes that find
    /// nothing are not errors.
    #[error("{layer} configuration file not found: {path}")]
    NotFound { layer: Layer, path: String },

    /// File content did not parse as its detected format.
    #[error("failed to parse {format} in {layer} configuration {path}: {message}")]
    Parse {
        layer: Layer,
        format: ConfigFormat,
        path: String,
        message: String,
    },

    /// A read failed for a reason other than the file being absent.
    #[error("failed to read {layer} configuration {path}: {message}")]
    Io {
        layer: Layer,
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for strata operations
pub type StrataResult<T> = Result<T, StrataError>;

impl StrataError {
    /// Create an IO or NotFound error from a std::io::Error, depending on
    /// its kind
    pub fn read(layer: Layer, path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();

        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound { layer, path };
        }

        Self::Io {
            layer,
            path,
            message: source.to_string(),
            source,
        }
    }

    /// True when the error means a configured file was simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, StrataError::NotFound { .. })
    }

    /// The configuration layer this error originated from
    pub fn layer(&self) -> Layer {
        match self {
            StrataError::NotFound { layer, .. }
            | StrataError::Parse { layer, .. }
            | StrataError::Io { layer, .. } => *layer,
        }
    }
}
