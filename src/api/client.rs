//! HTTP client with bearer token injection.
//!
//! All requests go to a fixed base URL. Authenticated requests read the
//! token from the session store immediately before sending, so a token
//! written by another process is picked up without restart. Requests run
//! to completion or transport failure; there is no retry and no explicit
//! timeout.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde::Serialize;

use crate::session::Session;

/// HTTP client wrapper for the MediVault portal API.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a new API client with the given base URL.
    pub fn new(base_url: &str, session: Arc<Session>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn bearer(&self) -> Option<String> {
        match self.session.token() {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Could not read token from storage: {}", e);
                None
            }
        }
    }

    /// Send an unauthenticated POST with a JSON body to a relative path.
    /// Used for login and signup where no token exists yet.
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        self.client.post(&url).json(body).send().await
    }

    /// Send an authenticated GET request to a relative API path.
    pub async fn authenticated_get(&self, path: &str) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.get(&url);
        if let Some(token) = self.bearer() {
            builder = builder.bearer_auth(token);
        }
        builder.send().await
    }

    /// Send an authenticated DELETE request to a relative API path.
    pub async fn authenticated_delete(&self, path: &str) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.delete(&url);
        if let Some(token) = self.bearer() {
            builder = builder.bearer_auth(token);
        }
        builder.send().await
    }

    /// Send an authenticated multipart POST (report uploads).
    ///
    /// The content type and boundary are left to reqwest.
    pub async fn authenticated_multipart_post(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.post(&url).multipart(form);
        if let Some(token) = self.bearer() {
            builder = builder.bearer_auth(token);
        }
        builder.send().await
    }
}
