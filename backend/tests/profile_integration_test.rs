//! Integration tests for the calculator, profile and image routes

mod common;

use aquafit_backend::{routes, state::AppState};
use axum::http::StatusCode;
use common::{image_part, profile_part, Part, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn test_bmi_reference_values() {
    let app = TestApp::new();

    for (weight, height, value, category) in [
        ("70", "175", 22.9, "Normal weight"),
        ("50", "180", 15.4, "Underweight"),
        ("110", "170", 38.1, "Obesity"),
    ] {
        let (status, body) = app
            .post("/api/v1/bmi", &json!({ "weight": weight, "height": height }).to_string())
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["value"], value);
        assert_eq!(body["category"], category);
    }
}

#[tokio::test]
async fn test_bmi_blank_weight_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/v1/bmi", r#"{"weight": "", "height": "175"}"#)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["field"], "weight");
}

#[tokio::test]
async fn test_profile_summary() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/v1/profile",
            r#"{"weight": 70, "height": "175", "age": "30", "gender": "male",
                "goal": "maintain", "activityType": "intense", "daysPerWeek": 5}"#,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["bmi"]["value"], 22.9);
    assert_eq!(body["targets"]["water_intake"], "2450 ml");
    assert_eq!(body["profile"]["activity_level"], "intense");
}

#[tokio::test]
async fn test_profile_missing_fields_listed_with_labels() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/v1/profile", r#"{"weight": "70"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    let labels: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Height (cm)",
            "Age",
            "Gender",
            "Fitness Goal",
            "Activity Level",
            "Days per Week"
        ]
    );
}

#[tokio::test]
async fn test_image_preview() {
    let app = TestApp::new();

    let (status, body) = app
        .post_multipart("/api/v1/images", &[image_part(b"jpeg-bytes".to_vec())], None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["mime_type"], "image/jpeg");
    assert_eq!(body["size_bytes"], 10);
    assert!(body["data_url"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn test_eleven_mib_image_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post_multipart(
            "/api/v1/images",
            &[image_part(vec![0u8; 11 * 1024 * 1024])],
            None,
        )
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!body.contains("data_url"));
}

#[tokio::test]
async fn test_image_just_over_limit_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post_multipart(
            "/api/v1/images",
            &[image_part(vec![0u8; 10 * 1024 * 1024 + 1])],
            None,
        )
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "INVALID_IMAGE");
}

#[tokio::test]
async fn test_non_image_rejected() {
    let app = TestApp::new();
    let pdf = Part::File {
        name: "image",
        file_name: "report.pdf",
        content_type: "application/pdf",
        bytes: b"%PDF-1.4".to_vec(),
    };

    let (status, _) = app.post_multipart("/api/v1/images", &[pdf], None).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_analysis_without_ai_is_unavailable() {
    let app = TestApp::new();

    let (status, body) = app
        .post_multipart(
            "/api/v1/analysis",
            &[profile_part(), image_part(b"jpeg".to_vec())],
            None,
        )
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("AI_UNAVAILABLE"));
}

#[tokio::test]
async fn test_metrics_count_bmi_calculations() {
    let handle = routes::install_prometheus_recorder().unwrap();
    let state = AppState::new(common::test_config())
        .unwrap()
        .with_metrics(handle);
    let app = TestApp {
        app: routes::create_router(state),
    };

    let (status, _) = app
        .post("/api/v1/bmi", r#"{"weight": "70", "height": "175"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("aquafit_bmi_calculations_total"));
}
