//! Tool-specific error types.
//!
//! Messages are rendered verbatim after `Error retrieving <subject>: `, so
//! the variants carry no prefix of their own.

use thiserror::Error;

use crate::domains::diary::DiaryError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments were well-formed but inconsistent (e.g. start after end).
    #[error("{0}")]
    Validation(String),

    /// Date parsing or remote fetch failed.
    #[error(transparent)]
    Diary(#[from] DiaryError),
}

impl ToolError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
