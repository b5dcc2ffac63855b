//! BMI calculator and profile form routes

use crate::error::ApiResult;
use crate::services::ProfileService;
use axum::Json;
use aquafit_shared::types::{BmiRequest, BmiResponse, ProfileForm, ProfileSummary};

/// POST /api/v1/bmi - Calculate BMI, healthy range and daily targets
pub async fn calculate_bmi(Json(req): Json<BmiRequest>) -> ApiResult<Json<BmiResponse>> {
    Ok(Json(ProfileService::calculate_bmi(&req)?))
}

/// POST /api/v1/profile - Validate the dashboard profile
pub async fn save_profile(Json(form): Json<ProfileForm>) -> ApiResult<Json<ProfileSummary>> {
    Ok(Json(ProfileService::summarize(form)?))
}
