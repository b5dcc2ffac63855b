//! Image intake and body analysis routes

use crate::error::{ApiError, ApiResult};
use crate::services::{AnalysisInput, AnalysisReport, ProfileService};
use crate::state::AppState;
use aquafit_shared::types::{ImagePreview, ProfileForm, REQUIRED_MESSAGE};
use aquafit_shared::validation::ValidationError;
use aquafit_shared::{FormError, ImageAsset};
use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use tracing::debug;

/// Header carrying the caller's session key
pub const SESSION_HEADER: &str = "x-session-id";

/// Session key used when the header is absent
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// Fields collected from a multipart submission
#[derive(Default)]
struct AnalysisUpload {
    profile: Option<ProfileForm>,
    image: Option<ImageAsset>,
}

/// POST /api/v1/images - Accept an image and return its preview
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ImagePreview>> {
    let upload = read_upload(multipart, state.config().analysis.max_image_bytes).await?;
    let image = upload
        .image
        .ok_or_else(|| FormError::new(vec![ValidationError::new("image", REQUIRED_MESSAGE)]))?;

    Ok(Json(ImagePreview {
        mime_type: image.mime_type().to_string(),
        size_bytes: image.size_bytes(),
        data_url: image.data_url(),
    }))
}

/// POST /api/v1/analysis - Run the body analysis for the caller's session
///
/// Expects multipart fields `profile` (JSON profile form) and `image`.
pub async fn run_analysis(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Json<AnalysisReport>> {
    let workflow = state.analysis.clone().ok_or(ApiError::AiUnavailable)?;

    let upload = read_upload(multipart, state.config().analysis.max_image_bytes).await?;
    let form = upload
        .profile
        .ok_or_else(|| FormError::new(vec![ValidationError::new("profile", REQUIRED_MESSAGE)]))?;
    let profile = form.into_profile()?;
    let bmi = ProfileService::bmi_for(&profile)?;

    let input = AnalysisInput {
        profile,
        bmi: Some(bmi),
        image: upload.image,
    };
    let report = workflow.run(&session_key(&headers), input).await?;

    Ok(Json(report))
}

/// Session key from the request, or the shared anonymous key
pub fn session_key(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(ANONYMOUS_SESSION)
        .to_string()
}

async fn read_upload(mut multipart: Multipart, max_image_bytes: usize) -> ApiResult<AnalysisUpload> {
    let mut upload = AnalysisUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "profile" => {
                let text = field.text().await?;
                let form = serde_json::from_str(&text)
                    .map_err(|e| ApiError::BadRequest(format!("profile is not valid JSON: {}", e)))?;
                upload.profile = Some(form);
            }
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;

                // A file input left empty still sends a nameless, empty part
                if bytes.is_empty() && file_name.is_empty() {
                    continue;
                }
                upload.image = Some(ImageAsset::from_upload_with_limit(&bytes, &mime, max_image_bytes)?);
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_key_from_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_key(&headers), ANONYMOUS_SESSION);

        headers.insert(SESSION_HEADER, HeaderValue::from_static("  tab-42 "));
        assert_eq!(session_key(&headers), "tab-42");

        headers.insert(SESSION_HEADER, HeaderValue::from_static(""));
        assert_eq!(session_key(&headers), ANONYMOUS_SESSION);
    }
}
