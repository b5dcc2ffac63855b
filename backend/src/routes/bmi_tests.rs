//! Property-based tests for the BMI calculator route
//!
//! Invalid numeric input must never produce a result, and any valid pair
//! must produce a category consistent with the displayed value.

#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::routes::create_router;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(AppConfig::default()).unwrap()
    }

    async fn post_bmi(body: Value) -> (StatusCode, Value) {
        let app = create_router(create_test_state());
        let request = Request::builder()
            .uri("/api/v1/bmi")
            .method("POST")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Text that is blank, non-numeric or not positive
    fn invalid_number_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("".to_string()),
            Just("   ".to_string()),
            Just("0".to_string()),
            "-[1-9][0-9]{0,2}".prop_map(|s| s),
            "[a-z]{1,8}".prop_map(|s| s),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Property: invalid weight never yields a BMI
        #[test]
        fn prop_invalid_weight_returns_400(weight in invalid_number_strategy()) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let (status, body) = post_bmi(json!({ "weight": weight, "height": "175" })).await;
                prop_assert_eq!(status, StatusCode::BAD_REQUEST);
                prop_assert_eq!(&body["error"]["field"], "weight");
                prop_assert!(body.get("value").is_none());
                Ok(())
            })?;
        }

        /// Property: valid input yields a value whose category matches its range
        #[test]
        fn prop_valid_input_category_matches_value(
            weight in 30.0f64..200.0,
            height in 120.0f64..220.0,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let (status, body) = post_bmi(json!({ "weight": weight, "height": height })).await;
                prop_assert_eq!(status, StatusCode::OK);
                let value = body["value"].as_f64().unwrap();
                let expected = if value < 18.5 {
                    "Underweight"
                } else if value < 25.0 {
                    "Normal weight"
                } else if value < 30.0 {
                    "Overweight"
                } else {
                    "Obesity"
                };
                prop_assert_eq!(body["category"].as_str().unwrap(), expected);
                Ok(())
            })?;
        }
    }

    #[tokio::test]
    async fn test_reference_value() {
        let (status, body) = post_bmi(json!({ "weight": "70", "height": "175" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["value"], 22.9);
        assert_eq!(body["category"], "Normal weight");
        assert_eq!(body["targets"]["water_intake"], "2450 ml");
        assert_eq!(body["targets"]["protein_intake"], "126.0 g");
    }

    #[tokio::test]
    async fn test_zero_height_rejected() {
        let (status, body) = post_bmi(json!({ "weight": "70", "height": "0" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["field"], "height");
    }

    #[tokio::test]
    async fn test_infinite_bmi_rejected() {
        let (status, body) = post_bmi(json!({ "weight": "1e300", "height": "1e-10" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["field"], "bmi");
    }
}
