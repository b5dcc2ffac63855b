//! AquaFit WASM Module
//!
//! This crate provides WebAssembly bindings for the calculations the
//! dashboard runs in the browser before anything is sent to the server.

use aquafit_shared::{calculate_daily_targets, evaluate_bmi as evaluate_bmi_form, MAX_IMAGE_BYTES};
use wasm_bindgen::prelude::*;

/// Evaluate the BMI calculator form
///
/// Returns the BMI result as JSON, or throws with the validation message.
#[wasm_bindgen]
pub fn evaluate_bmi(weight: &str, height: &str) -> Result<String, JsValue> {
    bmi_json(weight, height).map_err(|msg| JsValue::from_str(&msg))
}

/// Daily water and protein targets for a body weight, as JSON
#[wasm_bindgen]
pub fn daily_targets(weight_kg: f64) -> String {
    targets_json(weight_kg)
}

/// Whether a selected file may be uploaded
#[wasm_bindgen]
pub fn image_within_limit(size_bytes: f64) -> bool {
    (0.0..=MAX_IMAGE_BYTES as f64).contains(&size_bytes)
}

fn bmi_json(weight: &str, height: &str) -> Result<String, String> {
    let result = evaluate_bmi_form(weight, height).map_err(|e| e.to_string())?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

fn targets_json(weight_kg: f64) -> String {
    serde_json::to_string(&calculate_daily_targets(weight_kg)).unwrap_or_else(|_| "{}".to_string())
}
