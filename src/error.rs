//! Error types for the MediVault desktop client.
//!
//! One enum covers the whole client. Only the 401 path has centralized
//! side effects (see `session::Session::force_logout`); every other
//! variant is surfaced once to the caller for presentation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// The server rejected the bearer token (HTTP 401). The forced-logout
    /// sequence has already run by the time this is returned.
    #[error("Authentication failed. Please login again.")]
    Authentication,

    /// HTTP 403. Surfaced with the server's message; does not end the session.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Non-success status on the report download path.
    #[error("Download failed ({status}): {message}")]
    Download { status: u16, message: String },

    /// Any other non-success response from the portal API.
    #[error("{0}")]
    Api(String),

    /// Transport-level failure. Single attempt, no retry.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Client-side field check failed; the request was never sent.
    #[error("{0}")]
    Validation(String),

    /// Credential store operation failed.
    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
