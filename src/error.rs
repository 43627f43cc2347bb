//! Crate error type and the user-facing alert it is rendered into.
//!
//! ERROR HANDLING
//! ==============
//! Screens never surface a `ClientError` directly. They translate it into an
//! [`Alert`], and the only distinction drawn at that level is whether the
//! server answered with a non-success status (`Rejected`) or the request
//! never completed (everything else).

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::fmt;

use crate::attachment::AttachmentError;
use crate::config::ConfigError;
use crate::storage::StorageError;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server rejected request: status {status}")]
    Rejected { status: u16, body: String },

    /// A success response carried a body we could not interpret.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Reading or writing the local key/value store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The selected proof-of-payment file was not usable.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    /// Client configuration was missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An authorized call was attempted without a session token.
    #[error("not logged in")]
    Unauthenticated,
}

impl ClientError {
    /// Whether the backend was reached and refused the request.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

// =============================================================================
// ALERT
// =============================================================================

/// A dismissable message shown to the user. The screen keeps its prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into() }
    }

    /// Alert with a title only.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, String::new())
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}
