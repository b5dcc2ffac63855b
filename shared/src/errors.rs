//! Error types for the AquaFit domain layer

use crate::validation::ValidationError;
use std::fmt;
use thiserror::Error;

/// Numeric form input that could not be used for a calculation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    /// Positive, but too large or too small to give a usable result
    #[error("{field} is outside the supported range")]
    OutOfRange { field: &'static str },
}

impl InputError {
    /// Name of the offending form field
    pub fn field(&self) -> &'static str {
        match self {
            InputError::Missing { field }
            | InputError::NotANumber { field, .. }
            | InputError::NotPositive { field }
            | InputError::OutOfRange { field } => field,
        }
    }
}

/// Rejected image upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image is {size_bytes} bytes, the limit is {limit_bytes} bytes")]
    TooLarge { size_bytes: usize, limit_bytes: usize },

    #[error("Image file is empty")]
    Empty,

    #[error("Unsupported file type '{0}', expected an image")]
    NotAnImage(String),
}

/// AI completion that does not follow the mandated layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("missing '{0}' line")]
    MissingLine(&'static str),

    #[error("'{0}' appears more than once")]
    DuplicateLine(&'static str),

    #[error("malformed '{label}' line: {line}")]
    MalformedPercentage { label: &'static str, line: String },

    #[error("'{label}' value {value} is outside 0-100")]
    PercentageOutOfRange { label: &'static str, value: String },

    #[error("diet plan has {found} entries, expected 5")]
    WrongMealCount { found: usize },

    #[error("malformed diet plan entry: {0}")]
    MalformedMeal(String),

    #[error("diet plan entry {position} is '{found}', expected '{expected}'")]
    UnexpectedMeal {
        position: usize,
        expected: &'static str,
        found: String,
    },
}

/// Form submission with one or more invalid fields
#[derive(Debug, Clone)]
pub struct FormError {
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ValidationError::user_message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FormError {}

impl FormError {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Whether a given field was reported
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}
