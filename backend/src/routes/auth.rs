//! Account routes
//!
//! Forms are validated here; the accounts themselves live in the upstream
//! auth service.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use aquafit_shared::types::{LoginRequest, RegisterForm};
use aquafit_shared::validation::{validate_login, validate_register_form};
use serde_json::Value;
use tracing::info;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new account
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let request = validate_register_form(&form)?;
    let body = state.auth.register(&request).await?;
    info!("Account registered");
    Ok((StatusCode::CREATED, Json(body)))
}

/// Log in with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    validate_login(&req)?;
    let body = state.auth.login(&req).await?;
    Ok(Json(body))
}
