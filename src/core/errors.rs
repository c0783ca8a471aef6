//! Domain error types
//!
//! Errors raised while reading a transcript from disk. Controller operations
//! themselves never fail; they degrade to no-ops.

use std::path::PathBuf;

use thiserror::Error;

/// Errors related to transcript loading
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Reading the transcript file failed
    #[error("Failed to read transcript {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not valid JSON
    #[error("Line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A line is valid JSON but not a message record
    #[error("Line {line}: {reason}")]
    Unsupported { line: usize, reason: String },
}

impl TranscriptError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error concerns a single line (skippable)
    pub fn is_line_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Unsupported { .. })
    }
}
