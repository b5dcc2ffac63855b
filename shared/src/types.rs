//! API request and response types

use crate::errors::FormError;
use crate::health_metrics::{BmiResult, DailyTargets};
use crate::models::{ActivityLevel, FitnessGoal, Gender, ProfileInput};
use crate::validation::{
    parse_positive_number, validate_age, validate_days_per_week, ValidationError,
};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// A form value sent either as typed text or as a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    pub fn as_text(&self) -> String {
        match self {
            FormValue::Number(n) => n.to_string(),
            FormValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

fn text_of(value: &Option<FormValue>) -> String {
    value.as_ref().map(FormValue::as_text).unwrap_or_default()
}

// ============================================================================
// BMI
// ============================================================================

/// BMI calculator request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BmiRequest {
    #[serde(default)]
    pub weight: Option<FormValue>,
    #[serde(default)]
    pub height: Option<FormValue>,
}

impl BmiRequest {
    pub fn weight_text(&self) -> String {
        text_of(&self.weight)
    }

    pub fn height_text(&self) -> String {
        text_of(&self.height)
    }
}

/// BMI calculator response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResponse {
    #[serde(flatten)]
    pub bmi: BmiResult,
    pub healthy_weight_min_kg: f64,
    pub healthy_weight_max_kg: f64,
    pub targets: DailyTargets,
}

/// Wire form of [`DailyTargets`], numbers plus display strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetsInfo {
    pub water_ml: u32,
    pub protein_g: f64,
    /// e.g. "2450 ml"
    pub water_intake: String,
    /// e.g. "126.0 g"
    pub protein_intake: String,
}

impl From<DailyTargets> for TargetsInfo {
    fn from(targets: DailyTargets) -> Self {
        Self {
            water_ml: targets.water_ml,
            protein_g: targets.protein_g,
            water_intake: targets.water_display(),
            protein_intake: targets.protein_display(),
        }
    }
}

impl From<TargetsInfo> for DailyTargets {
    fn from(info: TargetsInfo) -> Self {
        Self {
            water_ml: info.water_ml,
            protein_g: info.protein_g,
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Raw dashboard profile form
///
/// Every field arrives as entered; [`ProfileForm::into_profile`] and
/// [`ProfileForm::into_saved_profile`] do the required-field check and parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub weight: Option<FormValue>,
    #[serde(default)]
    pub height: Option<FormValue>,
    #[serde(default)]
    pub age: Option<FormValue>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default, alias = "activityType")]
    pub activity_level: Option<String>,
    #[serde(default, alias = "daysPerWeek")]
    pub days_per_week: Option<FormValue>,
    #[serde(default, alias = "healthCondition")]
    pub health_conditions: Option<String>,
}

/// Message used for required fields left blank
pub const REQUIRED_MESSAGE: &str = "This field is required";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ProfileForm {
    /// Validate the form into a [`ProfileInput`]
    ///
    /// Weight, height, age, gender and goal are required. Activity level
    /// and days per week are optional but checked when present.
    pub fn into_profile(self) -> Result<ProfileInput, FormError> {
        self.validate(false)
    }

    /// Validate the form for saving
    ///
    /// Same as [`ProfileForm::into_profile`], but activity level and days
    /// per week are required as well.
    pub fn into_saved_profile(self) -> Result<ProfileInput, FormError> {
        self.validate(true)
    }

    fn validate(self, require_activity: bool) -> Result<ProfileInput, FormError> {
        let mut errors = Vec::new();

        let weight = parse_positive_number("weight", &text_of(&self.weight));
        let height = parse_positive_number("height", &text_of(&self.height));
        if let Err(e) = &weight {
            errors.push(ValidationError::from(e.clone()));
        }
        if let Err(e) = &height {
            errors.push(ValidationError::from(e.clone()));
        }

        let age_text = text_of(&self.age);
        let age = if age_text.trim().is_empty() {
            errors.push(ValidationError::new("age", REQUIRED_MESSAGE));
            None
        } else {
            match age_text.trim().parse::<u32>() {
                Ok(age) => match validate_age(age) {
                    Ok(()) => Some(age),
                    Err(msg) => {
                        errors.push(ValidationError::new("age", &msg));
                        None
                    }
                },
                Err(_) => {
                    errors.push(ValidationError::new("age", "Age must be a whole number"));
                    None
                }
            }
        };

        let gender = match non_blank(&self.gender) {
            None => {
                errors.push(ValidationError::new("gender", REQUIRED_MESSAGE));
                None
            }
            Some(raw) => raw
                .parse::<Gender>()
                .map_err(|msg| errors.push(ValidationError::new("gender", &msg)))
                .ok(),
        };

        let goal = match non_blank(&self.goal) {
            None => {
                errors.push(ValidationError::new("goal", REQUIRED_MESSAGE));
                None
            }
            Some(raw) => raw
                .parse::<FitnessGoal>()
                .map_err(|msg| errors.push(ValidationError::new("goal", &msg)))
                .ok(),
        };

        let activity_level = match non_blank(&self.activity_level) {
            None => {
                if require_activity {
                    errors.push(ValidationError::new("activity_level", REQUIRED_MESSAGE));
                }
                None
            }
            Some(raw) => raw
                .parse::<ActivityLevel>()
                .map_err(|msg| errors.push(ValidationError::new("activity_level", &msg)))
                .ok(),
        };

        let days_text = text_of(&self.days_per_week);
        let days_per_week = if days_text.trim().is_empty() {
            if require_activity {
                errors.push(ValidationError::new("days_per_week", REQUIRED_MESSAGE));
            }
            None
        } else {
            match days_text.trim().parse::<u8>() {
                Ok(days) => validate_days_per_week(days)
                    .map(|_| days)
                    .map_err(|msg| errors.push(ValidationError::new("days_per_week", &msg)))
                    .ok(),
                Err(_) => {
                    errors.push(ValidationError::new(
                        "days_per_week",
                        "Days per week must be a whole number",
                    ));
                    None
                }
            }
        };

        match (weight, height, age, gender, goal) {
            (Ok(weight_kg), Ok(height_cm), Some(age_years), Some(gender), Some(goal))
                if errors.is_empty() =>
            {
                Ok(ProfileInput {
                    weight_kg,
                    height_cm,
                    age_years,
                    gender,
                    goal,
                    activity_level,
                    days_per_week,
                    health_conditions: non_blank(&self.health_conditions).map(str::to_string),
                })
            }
            _ => Err(FormError::new(errors)),
        }
    }
}

/// Validated profile with its derived metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub profile: ProfileInput,
    pub bmi: BmiResult,
    pub targets: DailyTargets,
}

// ============================================================================
// Images
// ============================================================================

/// Accepted upload, ready for preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePreview {
    pub mime_type: String,
    pub size_bytes: usize,
    pub data_url: String,
}

// ============================================================================
// Accounts
// ============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form as filled in on the sign-up page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default, alias = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: String,
}

/// Registration body sent to the auth endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}
