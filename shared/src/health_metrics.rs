//! Health metrics calculations module
//!
//! Provides the BMI calculator used by the dashboard and the daily
//! water/protein targets attached to every body analysis.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Validated Inputs**: Raw form values are parsed before any math runs
//! 3. **Displayed = Classified**: Categories use the rounded BMI shown to users

use crate::errors::InputError;
use crate::types::TargetsInfo;
use crate::validation::parse_positive_number;
use serde::{Deserialize, Serialize};

/// Millilitres of water recommended per kg of body weight
pub const WATER_ML_PER_KG: f64 = 35.0;

/// Grams of protein recommended per kg of body weight
pub const PROTEIN_G_PER_KG: f64 = 1.8;

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Obesity")]
    Obesity,
}

impl BmiCategory {
    /// Get the BMI range for this category (lower bound inclusive)
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::NormalWeight => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obesity => (30.0, f64::INFINITY),
        }
    }

    /// Label shown next to the value
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "Your weight is below the healthy range for your height. Consider a nutrition plan focused on healthy weight gain."
            }
            BmiCategory::NormalWeight => {
                "Your weight is within the healthy range for your height. Keep up your current habits."
            }
            BmiCategory::Overweight => {
                "Your weight is above the healthy range for your height. Regular activity and a balanced diet can help."
            }
            BmiCategory::Obesity => {
                "Your weight is well above the healthy range for your height. Consider talking to a health professional."
            }
        }
    }

    /// Visual tag the front end uses to style the result
    pub fn display_hint(&self) -> DisplayHint {
        match self {
            BmiCategory::Underweight => DisplayHint::Warning,
            BmiCategory::NormalWeight => DisplayHint::Success,
            BmiCategory::Overweight => DisplayHint::Warning,
            BmiCategory::Obesity => DisplayHint::Destructive,
        }
    }
}

/// Styling tag attached to a computed result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayHint {
    Success,
    Warning,
    Destructive,
}

/// BMI calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI value, rounded to one decimal
    pub value: f64,
    pub category: BmiCategory,
    pub description: String,
    pub display_hint: DisplayHint,
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obesity
    }
}

/// Calculate healthy weight range for a given height
///
/// Based on BMI 18.5-25 (normal range)
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    let min_weight = 18.5 * height_m_sq;
    let max_weight = 25.0 * height_m_sq;
    (min_weight, max_weight)
}

/// Calculate the complete BMI result from already-parsed values
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> Result<BmiResult, InputError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(InputError::NotPositive { field: "weight" });
    }
    let height_m = height_cm / 100.0;
    if !height_m.is_finite() || height_m <= 0.0 {
        return Err(InputError::NotPositive { field: "height" });
    }

    let value = round_to_tenth(calculate_bmi(weight_kg, height_cm));
    if !value.is_finite() {
        return Err(InputError::OutOfRange { field: "bmi" });
    }
    // Daily targets are derived from the same weight
    if weight_kg * WATER_ML_PER_KG > u32::MAX as f64 {
        return Err(InputError::OutOfRange { field: "weight" });
    }
    let category = classify_bmi(value);

    Ok(BmiResult {
        value,
        category,
        description: category.description().to_string(),
        display_hint: category.display_hint(),
    })
}

/// Calculate BMI from raw form values
///
/// Both values must parse to positive numbers; nothing is computed otherwise.
pub fn evaluate_bmi(weight: &str, height: &str) -> Result<BmiResult, InputError> {
    let weight_kg = parse_positive_number("weight", weight)?;
    let height_cm = parse_positive_number("height", height)?;
    calculate_bmi_result(weight_kg, height_cm)
}

// ============================================================================
// Daily Targets
// ============================================================================

/// Daily intake targets derived from body weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "TargetsInfo", from = "TargetsInfo")]
pub struct DailyTargets {
    pub water_ml: u32,
    /// Protein in grams, one decimal
    pub protein_g: f64,
}

impl DailyTargets {
    /// Water target as displayed, e.g. "2450 ml"
    pub fn water_display(&self) -> String {
        format!("{} ml", self.water_ml)
    }

    /// Protein target as displayed, e.g. "126.0 g"
    pub fn protein_display(&self) -> String {
        format!("{:.1} g", self.protein_g)
    }
}

/// Calculate daily water and protein targets
///
/// water = weight × 35 ml, protein = weight × 1.8 g. Any weight accepted by
/// [`calculate_bmi_result`] fits; larger ones clamp to `u32::MAX` ml.
pub fn calculate_daily_targets(weight_kg: f64) -> DailyTargets {
    let water = (weight_kg * WATER_ML_PER_KG)
        .round()
        .clamp(0.0, u32::MAX as f64);
    DailyTargets {
        water_ml: water as u32,
        protein_g: round_to_tenth(weight_kg * PROTEIN_G_PER_KG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.1);
    }

    #[rstest]
    #[case("70", "175", 22.9, BmiCategory::NormalWeight)]
    #[case("50", "180", 15.4, BmiCategory::Underweight)]
    #[case("110", "170", 38.1, BmiCategory::Obesity)]
    #[case("85", "175", 27.8, BmiCategory::Overweight)]
    fn test_evaluate_bmi_reference_values(
        #[case] weight: &str,
        #[case] height: &str,
        #[case] expected: f64,
        #[case] category: BmiCategory,
    ) {
        let result = evaluate_bmi(weight, height).unwrap();
        assert_eq!(result.value, expected);
        assert_eq!(result.category, category);
        assert_eq!(result.description, category.description());
        assert_eq!(result.display_hint, category.display_hint());
    }

    #[rstest]
    #[case(18.4, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::NormalWeight)]
    #[case(24.9, BmiCategory::NormalWeight)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.9, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obesity)]
    fn test_category_boundaries(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    #[test]
    fn test_boundaries_through_full_calculation() {
        // At 200cm, BMI is exactly weight / 4
        assert_eq!(calculate_bmi_result(74.0, 200.0).unwrap().category, BmiCategory::NormalWeight);
        assert_eq!(calculate_bmi_result(100.0, 200.0).unwrap().category, BmiCategory::Overweight);
        assert_eq!(calculate_bmi_result(120.0, 200.0).unwrap().category, BmiCategory::Obesity);
    }

    #[test]
    fn test_category_uses_rounded_value() {
        // 99.9kg at 200cm -> 24.975, displayed as 25.0
        let result = calculate_bmi_result(99.9, 200.0).unwrap();
        assert_eq!(result.value, 25.0);
        assert_eq!(result.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_invalid_inputs_produce_no_result() {
        assert_eq!(evaluate_bmi("", "175"), Err(InputError::Missing { field: "weight" }));
        assert_eq!(evaluate_bmi("70", "0"), Err(InputError::NotPositive { field: "height" }));
        assert_eq!(evaluate_bmi("-70", "175"), Err(InputError::NotPositive { field: "weight" }));
        assert!(matches!(
            evaluate_bmi("seventy", "175"),
            Err(InputError::NotANumber { field: "weight", .. })
        ));
        assert!(calculate_bmi_result(f64::NAN, 175.0).is_err());
    }

    #[test]
    fn test_non_finite_bmi_rejected() {
        assert_eq!(
            calculate_bmi_result(1e300, 1e-10),
            Err(InputError::OutOfRange { field: "bmi" })
        );
        assert_eq!(
            evaluate_bmi("1e300", "1e-10"),
            Err(InputError::OutOfRange { field: "bmi" })
        );
    }

    #[test]
    fn test_weight_too_large_for_targets_rejected() {
        assert_eq!(
            calculate_bmi_result(2e8, 1e6),
            Err(InputError::OutOfRange { field: "weight" })
        );
        assert_eq!(calculate_daily_targets(1e300).water_ml, u32::MAX);
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&BmiCategory::NormalWeight).unwrap();
        assert_eq!(json, "\"Normal weight\"");
        for category in [
            BmiCategory::Underweight,
            BmiCategory::NormalWeight,
            BmiCategory::Overweight,
            BmiCategory::Obesity,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
        }
    }

    #[test]
    fn test_healthy_weight_range() {
        // For 175cm, healthy range should be ~56.7-76.6 kg
        let (min, max) = healthy_weight_range_kg(175.0);
        assert!((min - 56.7).abs() < 0.5);
        assert!((max - 76.6).abs() < 0.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: BMI is always positive for valid inputs
        #[test]
        fn prop_bmi_positive(weight in 20.0f64..500.0, height in 100.0f64..250.0) {
            let result = calculate_bmi_result(weight, height).unwrap();
            prop_assert!(result.value > 0.0);
        }

        /// Property: Category always agrees with the displayed value
        #[test]
        fn prop_category_matches_range(weight in 20.0f64..300.0, height in 100.0f64..250.0) {
            let result = calculate_bmi_result(weight, height).unwrap();
            let (min, max) = result.category.range();
            prop_assert!(result.value >= min && result.value < max,
                "BMI {} classified as {:?}", result.value, result.category);
        }

        /// Property: Taller height = lower BMI (same weight)
        #[test]
        fn prop_bmi_decreases_with_height(
            weight in 60.0f64..100.0,
            height1 in 150.0f64..170.0,
            height2 in 180.0f64..200.0
        ) {
            let bmi1 = calculate_bmi(weight, height1);
            let bmi2 = calculate_bmi(weight, height2);
            prop_assert!(bmi1 > bmi2);
        }

        /// Property: Healthy weight range contains weights that produce normal BMI
        #[test]
        fn prop_healthy_range_produces_normal_bmi(height in 150.0f64..200.0) {
            let (min, max) = healthy_weight_range_kg(height);
            let mid_weight = (min + max) / 2.0;
            let result = calculate_bmi_result(mid_weight, height).unwrap();
            prop_assert_eq!(result.category, BmiCategory::NormalWeight);
        }
    }

    // =========================================================================
    // Daily Target Tests
    // =========================================================================

    #[test]
    fn test_daily_targets_for_70kg() {
        let targets = calculate_daily_targets(70.0);
        assert_eq!(targets.water_ml, 2450);
        assert_eq!(targets.protein_g, 126.0);
        assert_eq!(targets.water_display(), "2450 ml");
        assert_eq!(targets.protein_display(), "126.0 g");
    }

    #[test]
    fn test_daily_targets_fractional_weight() {
        let targets = calculate_daily_targets(62.5);
        assert_eq!(targets.water_display(), "2188 ml");
        assert_eq!(targets.protein_display(), "112.5 g");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Heavier = more water and protein
        #[test]
        fn prop_targets_increase_with_weight(
            weight1 in 40.0f64..70.0,
            weight2 in 80.0f64..150.0
        ) {
            let light = calculate_daily_targets(weight1);
            let heavy = calculate_daily_targets(weight2);
            prop_assert!(heavy.water_ml > light.water_ml);
            prop_assert!(heavy.protein_g > light.protein_g);
        }
    }
}
