//! API client module for the MediVault desktop client.
//!
//! Provides the HTTP client with bearer header injection, authentication
//! operations, and report document operations matching the portal
//! backend API.

pub mod auth;
pub mod client;
pub mod documents;
pub mod types;


use reqwest::{Response, StatusCode};

use crate::error::PortalError;
use client::ApiClient;

/// Inspect an authenticated response for auth failures.
///
/// 401 runs the forced-logout sequence (clear token, TokenChanged,
/// ReturnToLogin) and maps to `PortalError::Authentication`. 403 maps to
/// `AccessDenied` without touching the session; only 401 ends the
/// session. Every other status passes through for the caller to
/// interpret.
pub(crate) async fn check_auth(api: &ApiClient, resp: Response) -> Result<Response, PortalError> {
    match resp.status() {
        StatusCode::UNAUTHORIZED => {
            api.session().force_logout();
            Err(PortalError::Authentication)
        }
        StatusCode::FORBIDDEN => {
            let message = resp.text().await.unwrap_or_default();
            Err(PortalError::AccessDenied(message))
        }
        _ => Ok(resp),
    }
}
