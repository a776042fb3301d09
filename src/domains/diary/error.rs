//! Diary-specific error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for diary operations.
pub type DiaryResult<T> = Result<T, DiaryError>;

/// Errors raised while parsing dates, loading credentials or fetching days.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// A date argument did not match `YYYY-MM-DD`.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// Neither the cookie variable nor the cookie file yielded a session.
    #[error(
        "No MyFitnessPal session found. Set MFP_COOKIES or export browser cookies to {}",
        .cookie_file.display()
    )]
    MissingCredentials { cookie_file: PathBuf },

    /// The exported cookie file exists but could not be read or parsed.
    #[error("Failed to read cookie file {}: {message}", .path.display())]
    CookieFile { path: PathBuf, message: String },

    /// The session cookies were rejected by the remote service.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network-level failure talking to the remote service.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The remote service answered with a body we could not interpret.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl DiaryError {
    /// Create an invalid date format error for `input`.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDateFormat(input.into())
    }

    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an unexpected response error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }
}
