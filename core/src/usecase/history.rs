use anyhow::Result;
use chrono::NaiveDate;

use crate::model::entry::{FoodEntry, MealType, Timestamp};
use crate::repository::FoodEntryRepository;
use crate::time::{local_date, start_of_day};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the entry name; empty matches everything.
    pub search: String,
    pub meal_type: Option<MealType>,
}

impl HistoryFilter {
    fn matches(&self, entry: &FoodEntry) -> bool {
        let matches_search = self.search.is_empty()
            || entry
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let matches_meal = self.meal_type.map_or(true, |m| entry.meal_type == m);
        matches_search && matches_meal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    /// Local midnight of the day.
    pub day_start: Timestamp,
    pub date: NaiveDate,
    pub entries: Vec<FoodEntry>,
    pub total_calories: u32,
}

pub struct HistoryUseCase<'a, R: FoodEntryRepository> {
    food_repo: &'a R,
}

impl<'a, R: FoodEntryRepository> HistoryUseCase<'a, R> {
    pub fn new(food_repo: &'a R) -> Self {
        Self { food_repo }
    }

    pub fn history(&self, filter: &HistoryFilter) -> Result<Vec<DayGroup>> {
        Ok(group_by_day(self.food_repo.list()?, filter))
    }
}

/// Matching entries newest first, grouped by local day (newest day first).
pub fn group_by_day(entries: Vec<FoodEntry>, filter: &HistoryFilter) -> Vec<DayGroup> {
    let mut matching: Vec<FoodEntry> = entries.into_iter().filter(|e| filter.matches(e)).collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut groups: Vec<DayGroup> = Vec::new();
    for entry in matching {
        let day_start = start_of_day(entry.timestamp);
        match groups.last_mut() {
            Some(group) if group.day_start == day_start => {
                group.total_calories = group.total_calories.saturating_add(entry.calories);
                group.entries.push(entry);
            }
            _ => groups.push(DayGroup {
                day_start,
                date: local_date(entry.timestamp),
                total_calories: entry.calories,
                entries: vec![entry],
            }),
        }
    }
    groups
}
