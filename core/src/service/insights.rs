use serde::Serialize;

use crate::model::settings::UserSettings;
use crate::model::stats::{WeeklyAverages, WeeklyProgress};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    Success,
    Warning,
    Info,
    Error,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub level: InsightLevel,
    pub message: String,
}

impl Insight {
    fn new(level: InsightLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

const STREAK_PRAISE_DAYS: u32 = 7;
const OVER_TARGET_RATIO: f64 = 1.1;
const UNDER_TARGET_RATIO: f64 = 0.8;
const LOW_WATER_RATIO: f64 = 0.7;
const LOW_PROTEIN_RATIO: f64 = 0.8;

/// Recommendations for the weekly overview, in display order.
pub fn generate_insights(
    averages: &WeeklyAverages,
    progress: &WeeklyProgress,
    settings: &UserSettings,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if progress.current_streak >= STREAK_PRAISE_DAYS {
        insights.push(Insight::new(
            InsightLevel::Success,
            format!(
                "Excellent! You've logged for {} days straight!",
                progress.current_streak
            ),
        ));
    }

    let calories = f64::from(averages.calories);
    let calorie_target = f64::from(settings.daily_calorie_target);
    if calories > calorie_target * OVER_TARGET_RATIO {
        insights.push(Insight::new(
            InsightLevel::Warning,
            "Your average intake is above your target. Consider reducing portion sizes.",
        ));
    } else if averages.calories > 0 && calories < calorie_target * UNDER_TARGET_RATIO {
        insights.push(Insight::new(
            InsightLevel::Info,
            "You're consistently under your goal. Make sure you're eating enough!",
        ));
    }

    if f64::from(averages.water) < f64::from(settings.daily_water_target) * LOW_WATER_RATIO {
        insights.push(Insight::new(
            InsightLevel::Info,
            format!(
                "Try to drink more water. Aim for at least {}ml per day.",
                settings.daily_water_target
            ),
        ));
    }

    if averages.protein < settings.daily_protein_target * LOW_PROTEIN_RATIO {
        insights.push(Insight::new(
            InsightLevel::Info,
            "Consider adding more protein to your meals for better muscle maintenance.",
        ));
    }

    insights
}
