//! Profile service - BMI calculator and dashboard profile checks

use aquafit_shared::health_metrics::{
    calculate_bmi_result, calculate_daily_targets, healthy_weight_range_kg, BmiResult,
};
use aquafit_shared::types::{BmiRequest, BmiResponse, ProfileForm, ProfileSummary};
use aquafit_shared::validation::parse_positive_number;
use aquafit_shared::{FormError, InputError, ProfileInput};
use tracing::info;

/// Profile service for the calculator and the dashboard form
pub struct ProfileService;

impl ProfileService {
    /// Evaluate the BMI calculator form
    ///
    /// Returns BMI, healthy weight range for the height and daily targets.
    /// Nothing is computed if either field is not a positive number.
    pub fn calculate_bmi(request: &BmiRequest) -> Result<BmiResponse, InputError> {
        let weight_kg = parse_positive_number("weight", &request.weight_text())?;
        let height_cm = parse_positive_number("height", &request.height_text())?;
        let bmi = calculate_bmi_result(weight_kg, height_cm)?;
        Self::record(&bmi);

        let (healthy_weight_min_kg, healthy_weight_max_kg) = healthy_weight_range_kg(height_cm);

        Ok(BmiResponse {
            bmi,
            healthy_weight_min_kg,
            healthy_weight_max_kg,
            targets: calculate_daily_targets(weight_kg),
        })
    }

    /// Validate the dashboard profile form and derive its metrics
    pub fn summarize(form: ProfileForm) -> Result<ProfileSummary, FormError> {
        let profile = form.into_saved_profile()?;
        let bmi = Self::bmi_for(&profile)?;

        Ok(ProfileSummary {
            targets: calculate_daily_targets(profile.weight_kg),
            bmi,
            profile,
        })
    }

    /// BMI of an already validated profile
    pub fn bmi_for(profile: &ProfileInput) -> Result<BmiResult, FormError> {
        let bmi = calculate_bmi_result(profile.weight_kg, profile.height_cm)
            .map_err(|e| FormError::new(vec![e.into()]))?;
        Self::record(&bmi);
        Ok(bmi)
    }

    fn record(bmi: &BmiResult) {
        info!(bmi = bmi.value, category = bmi.category.label(), "BMI calculated");
        metrics::counter!("aquafit_bmi_calculations_total", "category" => bmi.category.label())
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquafit_shared::types::FormValue;
    use aquafit_shared::BmiCategory;

    #[test]
    fn test_calculate_bmi_includes_range_and_targets() {
        let request = BmiRequest {
            weight: Some(FormValue::Number(70.0)),
            height: Some("175".into()),
        };
        let response = ProfileService::calculate_bmi(&request).unwrap();
        assert_eq!(response.bmi.value, 22.9);
        assert_eq!(response.bmi.category, BmiCategory::NormalWeight);
        assert!(response.healthy_weight_min_kg < 70.0 && 70.0 < response.healthy_weight_max_kg);
        assert_eq!(response.targets.water_display(), "2450 ml");
    }

    #[test]
    fn test_calculate_bmi_rejects_blank_weight() {
        let request = BmiRequest {
            weight: Some("".into()),
            height: Some("175".into()),
        };
        let err = ProfileService::calculate_bmi(&request).unwrap_err();
        assert_eq!(err.field(), "weight");
    }

    #[test]
    fn test_summarize_reports_missing_fields() {
        let err = ProfileService::summarize(ProfileForm::default()).unwrap_err();
        assert!(err.has_field("weight"));
        assert!(err.has_field("goal"));
        assert!(err.has_field("activity_level"));
        assert!(err.has_field("days_per_week"));
    }
}
