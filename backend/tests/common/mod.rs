//! Common test utilities for integration tests
//!
//! Builds the real router around configurable upstreams so tests can point
//! the Gemini client and the auth client at wiremock servers.

#![allow(dead_code)]

use aquafit_backend::{config::AppConfig, routes, state::AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

pub const BOUNDARY: &str = "aquafit-test-boundary";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// App with AI disabled and the default auth upstream
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build app state");
        Self {
            app: routes::create_router(state),
        }
    }

    /// App whose Gemini client talks to `api_base`
    pub fn with_gemini(api_base: &str) -> Self {
        let mut config = test_config();
        config.ai.enabled = true;
        config.ai.api_base = api_base.to_string();
        config.ai.model = "test-model".to_string();
        config.ai.api_key = Some("test-key".to_string());
        Self::with_config(config)
    }

    /// App whose auth client talks to `base_url`
    pub fn with_auth(base_url: &str) -> Self {
        let mut config = test_config();
        config.auth.base_url = base_url.to_string();
        Self::with_config(config)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a multipart POST request
    pub async fn post_multipart(
        &self,
        path: &str,
        parts: &[Part],
        session: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(session) = session {
            builder = builder.header("X-Session-Id", session);
        }
        let request = builder.body(Body::from(multipart_body(parts))).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

/// One multipart field
pub enum Part {
    Text { name: &'static str, value: String },
    File {
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn profile_part() -> Part {
    Part::Text {
        name: "profile",
        value: serde_json::json!({
            "weight": "70",
            "height": "175",
            "age": "30",
            "gender": "female",
            "goal": "gain-muscle",
            "healthCondition": ""
        })
        .to_string(),
    }
}

pub fn image_part(bytes: Vec<u8>) -> Part {
    Part::File {
        name: "image",
        file_name: "me.jpg",
        content_type: "image/jpeg",
        bytes,
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.ai.request_timeout_secs = 5;
    config
}
