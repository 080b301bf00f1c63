//! Error types shared across flowsteer crates.

use std::path::PathBuf;

/// Top-level error type for flowsteer operations.
#[derive(Debug, thiserror::Error)]
pub enum FlowsteerError {
    /// Caller handed the core data it cannot work with (e.g. a zero-area field).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The first frame of the source could not be decoded.
    #[error("Source unreadable: {message}")]
    SourceUnreadable { message: String },

    #[error("Video error: {message}")]
    Video { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FlowsteerError.
pub type FlowsteerResult<T> = Result<T, FlowsteerError>;

impl FlowsteerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn source_unreadable(msg: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            message: msg.into(),
        }
    }

    pub fn video(msg: impl Into<String>) -> Self {
        Self::Video {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error came from the caller's input rather than the environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
