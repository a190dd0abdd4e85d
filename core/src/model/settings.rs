use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Other
    }
}

impl Gender {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "m" | "male" => Some(Gender::Male),
            "f" | "female" => Some(Gender::Female),
            "o" | "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::Moderate
    }
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" | "veryactive" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }
}

/// The single settings record. Fields missing from a persisted file fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub daily_calorie_target: u32,
    pub daily_protein_target: f64,
    pub daily_carbs_target: f64,
    pub daily_fat_target: f64,
    /// Millilitres.
    pub daily_water_target: u32,
    pub user_name: String,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_calorie_target: 2000,
            daily_protein_target: 150.0,
            daily_carbs_target: 250.0,
            daily_fat_target: 70.0,
            daily_water_target: 2000,
            user_name: "User".to_string(),
            weight: 70.0,
            height: 170.0,
            age: 25,
            gender: Gender::default(),
            activity_level: ActivityLevel::default(),
        }
    }
}

impl UserSettings {
    pub fn validate(&self) -> ValidationResult {
        if self.daily_calorie_target == 0 {
            return Err(ValidationError::NonPositiveCalorieTarget);
        }
        for (label, grams) in [
            ("Protein", self.daily_protein_target),
            ("Carbs", self.daily_carbs_target),
            ("Fat", self.daily_fat_target),
        ] {
            if !(grams >= 0.0) {
                return Err(ValidationError::NegativeMacroTarget(label));
            }
        }
        if self.daily_water_target == 0 {
            return Err(ValidationError::NonPositiveWaterTarget);
        }
        if self.user_name.trim().is_empty() {
            return Err(ValidationError::BlankUserName);
        }
        if !(self.weight > 0.0) {
            return Err(ValidationError::NonPositiveBodyMetric("Weight"));
        }
        if !(self.height > 0.0) {
            return Err(ValidationError::NonPositiveBodyMetric("Height"));
        }
        if self.age == 0 {
            return Err(ValidationError::NonPositiveBodyMetric("Age"));
        }
        Ok(())
    }
}
