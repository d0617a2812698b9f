//! Error types for Trellis operations.
//!
//! This module defines [`TrellisError`], the primary error type used throughout
//! the library, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TrellisError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `TrellisError::Other`) for unexpected errors
//! - A missing template is not an error; resolution returns `Option`

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Trellis operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Failed to parse a query context description.
    #[error("Failed to parse query context at {path}: {message}")]
    ContextParseError { path: PathBuf, message: String },

    /// An output buffer operation was attempted with no open scope.
    #[error("No active output buffer to {operation}")]
    NoActiveBuffer { operation: &'static str },

    /// An output transform failed while finalizing a buffer.
    #[error("Transform '{transform}' failed: {message}")]
    TransformFailed { transform: String, message: String },

    /// A mime type could not be split into its parts.
    #[error("Invalid mime type: {mime}")]
    InvalidMimeType { mime: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Trellis operations.
pub type Result<T> = std::result::Result<T, TrellisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = TrellisError::ConfigNotFound {
            path: PathBuf::from("/foo/config.yml"),
        };
        assert!(err.to_string().contains("/foo/config.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = TrellisError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn no_active_buffer_names_operation() {
        let err = TrellisError::NoActiveBuffer {
            operation: "flush",
        };
        assert_eq!(err.to_string(), "No active output buffer to flush");
    }

    #[test]
    fn transform_failed_displays_transform_and_message() {
        let err = TrellisError::TransformFailed {
            transform: "hoist-late-styles".into(),
            message: "placeholder vanished".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hoist-late-styles"));
        assert!(msg.contains("placeholder vanished"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TrellisError = io_err.into();
        assert!(matches!(err, TrellisError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts_to_other() {
        let err: TrellisError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, TrellisError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
