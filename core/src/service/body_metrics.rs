use serde::Serialize;

use crate::model::settings::{Gender, UserSettings};
use crate::service::insights::InsightLevel;

/// Everything the profile view shows, derived from one settings record.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: i32,
    pub tdee: i32,
}

impl BodyProfile {
    pub fn from_settings(settings: &UserSettings) -> Self {
        let bmi = calculate_bmi(settings);
        Self {
            bmi,
            bmi_category: BmiCategory::from_bmi(bmi),
            bmr: calculate_bmr(settings),
            tdee: calculate_tdee(settings),
        }
    }
}

/// Body mass index; 0 when height is not positive.
pub fn calculate_bmi(settings: &UserSettings) -> f64 {
    if !(settings.height > 0.0) {
        return 0.0;
    }
    let height_m = settings.height / 100.0;
    settings.weight / (height_m * height_m)
}

/// Basal metabolic rate in kcal/day, truncated toward zero.
pub fn calculate_bmr(settings: &UserSettings) -> i32 {
    let weight = settings.weight;
    let height = settings.height;
    let age = f64::from(settings.age);
    let bmr = match settings.gender {
        Gender::Male | Gender::Other => 88.362 + 13.397 * weight + 4.799 * height - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight + 3.098 * height - 4.330 * age,
    };
    bmr as i32
}

/// Total daily energy expenditure: the truncated BMR scaled by activity level.
pub fn calculate_tdee(settings: &UserSettings) -> i32 {
    let bmr = calculate_bmr(settings);
    (f64::from(bmr) * settings.activity_level.multiplier()) as i32
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn level(&self) -> InsightLevel {
        match self {
            BmiCategory::Normal => InsightLevel::Success,
            BmiCategory::Underweight | BmiCategory::Overweight => InsightLevel::Warning,
            BmiCategory::Obese => InsightLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::ActivityLevel;

    fn body(gender: Gender, weight: f64, height: f64, age: u32) -> UserSettings {
        UserSettings {
            gender,
            weight,
            height,
            age,
            ..UserSettings::default()
        }
    }

    #[test]
    fn test_bmi() {
        let bmi = calculate_bmi(&body(Gender::Male, 70.0, 175.0, 25));
        assert!((bmi - 22.857).abs() < 0.01);
        assert_eq!(calculate_bmi(&body(Gender::Male, 70.0, 0.0, 25)), 0.0);
        assert_eq!(calculate_bmi(&body(Gender::Male, 70.0, -10.0, 25)), 0.0);
    }

    #[test]
    fn test_bmr_by_gender() {
        assert_eq!(calculate_bmr(&body(Gender::Male, 70.0, 175.0, 25)), 1724);
        assert_eq!(calculate_bmr(&body(Gender::Other, 70.0, 175.0, 25)), 1724);
        assert_eq!(calculate_bmr(&body(Gender::Female, 60.0, 165.0, 30)), 1383);
    }

    #[test]
    fn test_tdee_uses_truncated_bmr() {
        let mut settings = body(Gender::Male, 70.0, 175.0, 25);
        settings.activity_level = ActivityLevel::Moderate;
        assert_eq!(calculate_tdee(&settings), 2672);
        settings.activity_level = ActivityLevel::Sedentary;
        assert_eq!(calculate_tdee(&settings), 2068);
        settings.activity_level = ActivityLevel::VeryActive;
        assert_eq!(calculate_tdee(&settings), 3275);
    }

    #[test]
    fn test_bmi_category() {
        assert_eq!(BmiCategory::from_bmi(17.0), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(31.2), BmiCategory::Obese);
        assert_eq!(BmiCategory::Normal.level(), InsightLevel::Success);
        assert_eq!(BmiCategory::Obese.level(), InsightLevel::Error);
    }

    #[test]
    fn test_body_profile() {
        let profile = BodyProfile::from_settings(&body(Gender::Male, 70.0, 175.0, 25));
        assert_eq!(profile.bmi_category, BmiCategory::Normal);
        assert_eq!(profile.bmr, 1724);
        assert_eq!(profile.tdee, 2672);
    }
}
