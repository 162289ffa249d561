//! Sheet client error types.

use thiserror::Error;

/// Sheet API errors.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Service-account credentials are unusable or the token exchange failed.
    #[error("sheet authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure.
    #[error("sheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("sheet API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Fewer rows were written than requested.
    #[error("sheet append wrote {updated} of {expected} rows")]
    IncompleteAppend {
        /// Rows sent.
        expected: usize,
        /// Rows the API reported as written.
        updated: usize,
    },

    /// The request could not be built.
    #[error("invalid sheet request: {0}")]
    InvalidRequest(String),
}

impl SheetError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}
