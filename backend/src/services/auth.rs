//! Client for the upstream account endpoints
//!
//! Login and registration are owned by a separate service. Forms are
//! validated locally first; this client only forwards the clean payload and
//! translates the upstream answer.

use crate::config::AuthConfig;
use aquafit_shared::types::{LoginRequest, RegisterRequest};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";

/// Upstream account call failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthClientError {
    /// The service answered with a non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Thin HTTP client for `/api/auth/*`
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(config: &AuthConfig, timeout: Duration) -> Result<Self, AuthClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthClientError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST /api/auth/login
    pub async fn login(&self, request: &LoginRequest) -> Result<Value, AuthClientError> {
        self.forward(LOGIN_PATH, request, "Login failed").await
    }

    /// POST /api/auth/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, AuthClientError> {
        self.forward(REGISTER_PATH, request, "Registration failed").await
    }

    async fn forward<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        default_message: &str,
    ) -> Result<Value, AuthClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Forwarding to auth service");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Auth service request failed");
                AuthClientError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthClientError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(AuthClientError::Rejected {
                status: status.as_u16(),
                message: upstream_message(&text).unwrap_or_else(|| default_message.to_string()),
            });
        }

        Ok(success_body(&text))
    }
}

/// `message` field of a JSON error body, if there is one
fn upstream_message(text: &str) -> Option<String> {
    serde_json::from_str::<Value>(text)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn success_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "message": text }))
}
