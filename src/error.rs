//! Error types and handling infrastructure for chatbubble.
//!
//! The rendering core never fails: malformed markdown degrades to literal text. Errors only
//! come from the outer layers, such as loading a transcript, reading configuration or driving
//! the terminal. They are collected here using `thiserror`, while the binary wraps them with
//! `anyhow` for context.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for chatbubble operations.
#[derive(Error, Debug)]
pub enum BubbleError {
    /// File system related errors (file not found, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Transcript file is larger than the viewer accepts
    #[error("Transcript too large: {path} ({size} bytes)")]
    TranscriptTooLarge { path: PathBuf, size: u64 },

    /// Transcript content could not be decoded
    #[error("Invalid transcript: {message}")]
    TranscriptError { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Standard Result type for chatbubble operations.
pub type Result<T> = std::result::Result<T, BubbleError>;

impl BubbleError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a TranscriptError with a descriptive message
    pub fn transcript(message: impl Into<String>) -> Self {
        Self::TranscriptError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for BubbleError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            _ => "IO operation failed",
        };
        Self::FileError {
            message: message.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BubbleError {
    fn from(err: serde_json::Error) -> Self {
        Self::transcript(err.to_string())
    }
}
