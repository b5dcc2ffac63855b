//! Body analysis request and response layout
//!
//! The vision model is asked for a fixed plain-text layout:
//!
//! ```text
//! Body Fat: <number>%
//! Muscle Mass: <number>%
//! Diet Plan:
//! - Breakfast: <description>
//! - Morning Snack: <description>
//! - Lunch: <description>
//! - Afternoon Snack: <description>
//! - Dinner: <description>
//! ```
//!
//! [`parse_analysis_response`] accepts a completion only if all three parts
//! are present and well formed. There is no partial result.

use crate::errors::LayoutError;
use crate::health_metrics::{calculate_daily_targets, BmiResult, DailyTargets};
use crate::image::ImageAsset;
use crate::models::{AnalysisResult, DietPlan, MealSlot, ProfileInput};
use crate::validation::validate_percentage;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::fmt::Write as _;

const BODY_FAT: &str = "Body Fat";
const MUSCLE_MASS: &str = "Muscle Mass";
const DIET_PLAN: &str = "Diet Plan";

static PERCENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(body fat|muscle mass)\s*:\s*(\d{1,3}(?:\.\d+)?)\s*%$")
        .expect("percentage pattern is valid")
});

static DIET_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^diet plan\s*:$").expect("header pattern is valid"));

static MEAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\s*([^:]+?)\s*:\s*(\S.*)$").expect("meal pattern is valid"));

/// Everything one analysis attempt sends to the model
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub profile: ProfileInput,
    pub bmi: BmiResult,
    pub image: ImageAsset,
}

impl AnalysisRequest {
    pub fn new(profile: ProfileInput, bmi: BmiResult, image: ImageAsset) -> Self {
        Self {
            profile,
            bmi,
            image,
        }
    }

    /// Targets are derived from the profile weight only
    pub fn targets(&self) -> DailyTargets {
        calculate_daily_targets(self.profile.weight_kg)
    }

    /// Natural-language instruction sent alongside the image
    ///
    /// Deterministic: the same request always yields the same text.
    pub fn instruction(&self) -> String {
        let p = &self.profile;
        let mut text = String::from(
            "You are a fitness and nutrition assistant. Analyze the attached photo of the user \
             together with the profile below.\n\nProfile:\n",
        );
        let _ = writeln!(text, "- Weight: {} kg", p.weight_kg);
        let _ = writeln!(text, "- Height: {} cm", p.height_cm);
        let _ = writeln!(text, "- Age: {} years", p.age_years);
        let _ = writeln!(text, "- Gender: {}", p.gender);
        let _ = writeln!(text, "- Goal: {}", p.goal.description());
        if let Some(level) = p.activity_level {
            let _ = writeln!(text, "- Activity level: {}", level.as_str());
        }
        if let Some(days) = p.days_per_week {
            let _ = writeln!(text, "- Training days per week: {}", days);
        }
        let _ = writeln!(
            text,
            "- Health conditions: {}",
            p.health_conditions.as_deref().unwrap_or("none reported")
        );
        let _ = writeln!(
            text,
            "- BMI: {:.1} ({})",
            self.bmi.value,
            self.bmi.category.label()
        );

        text.push_str(
            "\nEstimate the body fat percentage and the muscle mass percentage from the photo, \
             and write a one-day diet plan suited to the goal and health conditions.\n\n\
             Reply using EXACTLY this layout, with no other text, no markdown and no extra lines:\n",
        );
        let _ = writeln!(text, "{}: <number>%", BODY_FAT);
        let _ = writeln!(text, "{}: <number>%", MUSCLE_MASS);
        let _ = writeln!(text, "{}:", DIET_PLAN);
        for slot in MealSlot::ALL {
            let _ = writeln!(text, "- {}: <description>", slot.label());
        }
        text
    }
}

/// The three extracted parts of a conforming completion
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnalysis {
    pub body_fat_percent: f64,
    pub muscle_mass_percent: f64,
    pub diet_plan: DietPlan,
}

impl ParsedAnalysis {
    pub fn into_result(self, targets: DailyTargets) -> AnalysisResult {
        AnalysisResult {
            body_fat_percent: self.body_fat_percent,
            muscle_mass_percent: self.muscle_mass_percent,
            diet_plan: self.diet_plan,
            targets,
        }
    }
}

/// Parse a completion against the mandated layout
pub fn parse_analysis_response(text: &str) -> Result<ParsedAnalysis, LayoutError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let body_fat_percent = extract_percentage(&lines, BODY_FAT)?;
    let muscle_mass_percent = extract_percentage(&lines, MUSCLE_MASS)?;
    let diet_plan = extract_diet_plan(&lines)?;

    Ok(ParsedAnalysis {
        body_fat_percent,
        muscle_mass_percent,
        diet_plan,
    })
}

fn extract_percentage(lines: &[&str], label: &'static str) -> Result<f64, LayoutError> {
    let prefix = label.to_lowercase();
    let mut found = None;

    for line in lines.iter().filter(|l| l.to_lowercase().starts_with(&prefix)) {
        if found.is_some() {
            return Err(LayoutError::DuplicateLine(label));
        }
        let malformed = || LayoutError::MalformedPercentage {
            label,
            line: line.to_string(),
        };
        let caps = PERCENT_LINE
            .captures(line)
            .filter(|caps| caps[1].eq_ignore_ascii_case(label))
            .ok_or_else(malformed)?;
        let value: f64 = caps[2].parse().map_err(|_| malformed())?;
        validate_percentage(value).map_err(|_| LayoutError::PercentageOutOfRange {
            label,
            value: caps[2].to_string(),
        })?;
        found = Some(value);
    }

    found.ok_or(LayoutError::MissingLine(label))
}

fn extract_diet_plan(lines: &[&str]) -> Result<DietPlan, LayoutError> {
    let mut headers = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| DIET_HEADER.is_match(line))
        .map(|(idx, _)| idx);
    let start = headers.next().ok_or(LayoutError::MissingLine(DIET_PLAN))?;
    if headers.next().is_some() {
        return Err(LayoutError::DuplicateLine(DIET_PLAN));
    }

    let mut entries: Vec<(String, String)> = Vec::with_capacity(MealSlot::ALL.len());
    for line in &lines[start + 1..] {
        if line.is_empty() {
            continue;
        }
        if !line.starts_with('-') {
            break;
        }
        let caps = MEAL_LINE
            .captures(line)
            .ok_or_else(|| LayoutError::MalformedMeal(line.to_string()))?;
        entries.push((caps[1].to_string(), caps[2].trim().to_string()));
    }

    if entries.len() != MealSlot::ALL.len() {
        return Err(LayoutError::WrongMealCount {
            found: entries.len(),
        });
    }

    let mut descriptions = Vec::with_capacity(entries.len());
    for (position, (slot, (label, description))) in MealSlot::ALL.iter().zip(entries).enumerate() {
        if !same_label(&label, slot.label()) {
            return Err(LayoutError::UnexpectedMeal {
                position: position + 1,
                expected: slot.label(),
                found: label,
            });
        }
        descriptions.push(description);
    }

    let descriptions: [String; 5] = descriptions
        .try_into()
        .map_err(|rest: Vec<String>| LayoutError::WrongMealCount { found: rest.len() })?;
    Ok(DietPlan::from_descriptions(descriptions))
}

fn same_label(found: &str, expected: &str) -> bool {
    let normalized = found.split_whitespace().collect::<Vec<_>>().join(" ");
    normalized.eq_ignore_ascii_case(expected)
}
