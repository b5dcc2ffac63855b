//! Input validation functions
//!
//! This module provides validation utilities for user input coming from
//! the dashboard and account forms. Email syntax is checked with the
//! `validator` crate.

use crate::errors::{FormError, InputError};
use crate::types::{LoginRequest, RegisterForm, RegisterRequest};
use validator::ValidateEmail;

/// Minimum password length accepted by the registration form
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Parse a form value that must be a positive number
pub fn parse_positive_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing { field });
    }
    let value: f64 = trimmed.parse().map_err(|_| InputError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(InputError::NotPositive { field });
    }
    Ok(value)
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Percentage must be a valid number".to_string());
    }
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate age in whole years
pub fn validate_age(age_years: u32) -> Result<(), String> {
    if age_years < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age_years > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate number of training days per week
pub fn validate_days_per_week(days: u8) -> Result<(), String> {
    if !(1..=7).contains(&days) {
        return Err("Days per week must be between 1 and 7".to_string());
    }
    Ok(())
}

// ============================================================================
// Account Forms
// ============================================================================

/// Validate the registration form and build the upstream request body
///
/// Every invalid field is reported, not just the first one.
pub fn validate_register_form(form: &RegisterForm) -> Result<RegisterRequest, FormError> {
    let mut errors = Vec::new();

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        errors.push(ValidationError::new("full_name", "Full name is required"));
    }
    if let Err(msg) = validate_email(&form.email) {
        errors.push(ValidationError::new("email", &msg));
    }
    if let Err(msg) = validate_password(&form.password) {
        errors.push(ValidationError::new("password", &msg));
    }
    if form.password != form.confirm_password {
        errors.push(ValidationError::new("confirm_password", "Passwords do not match"));
    }

    if !errors.is_empty() {
        return Err(FormError::new(errors));
    }

    Ok(RegisterRequest {
        username: full_name.to_string(),
        email: form.email.trim().to_string(),
        password: form.password.clone(),
    })
}

/// Validate the login form
pub fn validate_login(request: &LoginRequest) -> Result<(), FormError> {
    let mut errors = Vec::new();
    if let Err(msg) = validate_email(&request.email) {
        errors.push(ValidationError::new("email", &msg));
    }
    if request.password.is_empty() {
        errors.push(ValidationError::new("password", "Password is required"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormError::new(errors))
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Weight (kg)",
        "height" => "Height (cm)",
        "age" => "Age",
        "gender" => "Gender",
        "goal" => "Fitness Goal",
        "activity_level" => "Activity Level",
        "days_per_week" => "Days per Week",
        "health_conditions" => "Health Conditions",
        "bmi" => "BMI",
        "image" => "Image",
        "full_name" => "Full Name",
        "email" => "Email",
        "password" => "Password",
        "confirm_password" => "Confirm Password",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl From<InputError> for ValidationError {
    fn from(err: InputError) -> Self {
        ValidationError::new(err.field(), &err.to_string())
    }
}
