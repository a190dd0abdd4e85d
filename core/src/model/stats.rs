use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::entry::{FoodEntry, MealType, Timestamp, WaterEntry};

/// Totals for one local calendar day. Derived on demand, never persisted.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// The instant the day window was computed for.
    pub date: Timestamp,
    pub total_calories: u32,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_water: u32,
    pub entries: Vec<FoodEntry>,
    pub water_entries: Vec<WaterEntry>,
    /// Calorie target from the settings in effect when this was computed.
    pub target: u32,
}

impl DailyStats {
    /// A day qualifies when something was logged and the target was not exceeded.
    pub fn is_on_target(&self) -> bool {
        self.total_calories > 0 && self.total_calories <= self.target
    }

    pub fn remaining_calories(&self) -> i64 {
        i64::from(self.target) - i64::from(self.total_calories)
    }

    pub fn calories_by_meal(&self) -> BTreeMap<MealType, u32> {
        let mut by_meal = BTreeMap::new();
        for entry in &self.entries {
            let total = by_meal.entry(entry.meal_type).or_insert(0u32);
            *total = total.saturating_add(entry.calories);
        }
        by_meal
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_average: u32,
    pub days_on_target: u32,
    pub total_days: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct WeeklyAverages {
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub water: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(total_calories: u32, target: u32) -> DailyStats {
        DailyStats {
            date: 0,
            total_calories,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            total_water: 0,
            entries: Vec::new(),
            water_entries: Vec::new(),
            target,
        }
    }

    #[test]
    fn test_on_target_boundaries() {
        assert!(!stats_with(0, 2000).is_on_target());
        assert!(stats_with(1, 2000).is_on_target());
        assert!(stats_with(2000, 2000).is_on_target());
        assert!(!stats_with(2001, 2000).is_on_target());
    }

    #[test]
    fn test_remaining_can_go_negative() {
        assert_eq!(stats_with(1500, 2000).remaining_calories(), 500);
        assert_eq!(stats_with(2300, 2000).remaining_calories(), -300);
    }
}
