//! Authentication operations: login, registration, current-user lookup.
//!
//! Login and signup persist the bearer token if and only if the server
//! responds with a success status. The parsed body is returned to the
//! caller either way, so success and failure messaging stays a
//! presentation concern.

use reqwest::{Response, StatusCode};

use super::client::ApiClient;
use super::types::{AuthResponse, LoginRequest, SignupRequest, UserProfile};
use crate::error::PortalError;

/// Shared demo account behind the portal's "continue as guest" entry point.
pub const GUEST_EMAIL: &str = "guest@gmail.com";
pub const GUEST_PASSWORD: &str = "guest@1234";

/// POST /auth/login.
///
/// On a success status the returned token is written to the session
/// store, which signals TokenChanged once.
pub async fn login(
    api: &ApiClient,
    email: &str,
    password: &str,
) -> Result<(StatusCode, AuthResponse), PortalError> {
    let req = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let resp = api.post("/auth/login", &req).await?;
    read_auth_response(api, resp).await
}

/// Login with the shared demo account.
pub async fn login_guest(api: &ApiClient) -> Result<(StatusCode, AuthResponse), PortalError> {
    login(api, GUEST_EMAIL, GUEST_PASSWORD).await
}

/// POST /auth/signup with the full profile payload. Same token contract
/// as `login`.
pub async fn register(
    api: &ApiClient,
    profile: &SignupRequest,
) -> Result<(StatusCode, AuthResponse), PortalError> {
    let resp = api.post("/auth/signup", profile).await?;
    read_auth_response(api, resp).await
}

/// GET /api/me with bearer header.
///
/// A 401 runs the forced-logout sequence before the error is returned;
/// any other non-success status surfaces the server's message.
pub async fn current_user(api: &ApiClient) -> Result<UserProfile, PortalError> {
    let resp = api.authenticated_get("/api/me").await?;
    let resp = super::check_auth(api, resp).await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(PortalError::Api(format!(
            "Fetching profile failed ({}): {}",
            status, body
        )));
    }

    let profile = resp.json::<UserProfile>().await?;
    Ok(profile)
}

/// Parse an auth endpoint response, persisting the token on success.
///
/// Non-JSON bodies (some error paths return plain text) become a
/// message-only response rather than a parse failure.
async fn read_auth_response(
    api: &ApiClient,
    resp: Response,
) -> Result<(StatusCode, AuthResponse), PortalError> {
    let status = resp.status();
    let text = resp.text().await?;

    let body: AuthResponse = serde_json::from_str(&text).unwrap_or_else(|_| AuthResponse {
        message: if text.trim().is_empty() {
            None
        } else {
            Some(text)
        },
        token: None,
    });

    if status.is_success() {
        if let Some(ref token) = body.token {
            api.session().store_token(token)?;
            log::info!("Authenticated against the portal, token stored");
        }
    }

    Ok((status, body))
}
