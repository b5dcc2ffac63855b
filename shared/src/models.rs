//! Domain models for body analysis

use crate::health_metrics::DailyTargets;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender as selected on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err("Must be one of: male, female, other".to_string()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fitness goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessGoal {
    LoseWeight,
    GainMuscle,
    Maintain,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "lose-weight",
            FitnessGoal::GainMuscle => "gain-muscle",
            FitnessGoal::Maintain => "maintain",
        }
    }

    /// Phrase used when describing the goal to the model
    pub fn description(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "lose weight",
            FitnessGoal::GainMuscle => "gain muscle",
            FitnessGoal::Maintain => "maintain current weight",
        }
    }
}

impl FromStr for FitnessGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lose-weight" => Ok(FitnessGoal::LoseWeight),
            "gain-muscle" => Ok(FitnessGoal::GainMuscle),
            "maintain" => Ok(FitnessGoal::Maintain),
            _ => Err("Must be one of: lose-weight, gain-muscle, maintain".to_string()),
        }
    }
}

/// Training intensity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    Moderate,
    Intense,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Intense => "intense",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "intense" => Ok(ActivityLevel::Intense),
            _ => Err("Must be one of: light, moderate, intense".to_string()),
        }
    }
}

/// Validated snapshot of the dashboard profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub goal: FitnessGoal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_per_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_conditions: Option<String>,
}

// ============================================================================
// Diet Plan
// ============================================================================

/// Meal position in the daily plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealSlot {
    /// All slots in plan order
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::MorningSnack => "Morning Snack",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon Snack",
            MealSlot::Dinner => "Dinner",
        }
    }
}

/// One entry of the diet plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub slot: MealSlot,
    pub description: String,
}

/// Five meals, always in [`MealSlot::ALL`] order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietPlan {
    meals: [Meal; 5],
}

impl DietPlan {
    /// Build a plan from descriptions given in slot order
    pub fn from_descriptions(descriptions: [String; 5]) -> Self {
        let mut descriptions = descriptions.into_iter();
        let meals = MealSlot::ALL.map(|slot| Meal {
            slot,
            description: descriptions.next().unwrap_or_default(),
        });
        Self { meals }
    }

    pub fn meals(&self) -> &[Meal; 5] {
        &self.meals
    }

    pub fn meal(&self, slot: MealSlot) -> &Meal {
        &self.meals[slot as usize]
    }
}

/// Outcome of a successful body analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub body_fat_percent: f64,
    pub muscle_mass_percent: f64,
    pub diet_plan: DietPlan,
    /// Computed locally from weight, never taken from the model output
    pub targets: DailyTargets,
}
