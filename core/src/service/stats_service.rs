//! Aggregation over a snapshot of entries and settings.
//!
//! Every function here is pure: callers pass the full entry lists and the
//! current settings, and get freshly derived records back.

use tracing::debug;

use crate::model::entry::{FoodEntry, Timestamp, WaterEntry};
use crate::model::settings::UserSettings;
use crate::model::stats::{DailyStats, WeeklyAverages, WeeklyProgress};
use crate::time::{day_window, shift_days};

/// Days in the trailing window used for weekly stats, today included.
pub const WEEK_DAYS: i64 = 7;

/// Days scanned backwards when computing streaks.
pub const STREAK_SCAN_DAYS: i64 = 30;

pub fn compute_daily_stats(
    instant: Timestamp,
    food_entries: &[FoodEntry],
    water_entries: &[WaterEntry],
    settings: &UserSettings,
) -> DailyStats {
    let (start, end) = day_window(instant);
    let in_window = |ts: Timestamp| start <= ts && ts <= end;

    let entries: Vec<FoodEntry> = food_entries
        .iter()
        .filter(|e| in_window(e.timestamp))
        .cloned()
        .collect();
    let water: Vec<WaterEntry> = water_entries
        .iter()
        .filter(|w| in_window(w.timestamp))
        .cloned()
        .collect();

    DailyStats {
        date: instant,
        total_calories: saturating_total(entries.iter().map(|e| e.calories)),
        total_protein: entries.iter().map(|e| e.protein).sum(),
        total_carbs: entries.iter().map(|e| e.carbs).sum(),
        total_fat: entries.iter().map(|e| e.fat).sum(),
        total_water: saturating_total(water.iter().map(|w| w.amount)),
        entries,
        water_entries: water,
        // Read from the current settings, not the target that applied on that day.
        target: settings.daily_calorie_target,
    }
}

// Totals pin at u32::MAX instead of wrapping.
fn saturating_total(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0, u32::saturating_add)
}

/// Seven days ending at `now`, oldest first.
pub fn compute_weekly_stats(
    now: Timestamp,
    food_entries: &[FoodEntry],
    water_entries: &[WaterEntry],
    settings: &UserSettings,
) -> Vec<DailyStats> {
    (0..WEEK_DAYS)
        .rev()
        .map(|i| compute_daily_stats(shift_days(now, -i), food_entries, water_entries, settings))
        .collect()
}

pub fn compute_weekly_progress(
    now: Timestamp,
    food_entries: &[FoodEntry],
    water_entries: &[WaterEntry],
    settings: &UserSettings,
) -> WeeklyProgress {
    let mut current_streak = 0;
    let mut longest_streak = 0;
    let mut temp_streak = 0;

    // Today first, walking back. `current_streak` follows the running count only
    // while still inside the most recent week, so a miss today followed by
    // qualifying earlier days still reports that earlier run.
    for i in 0..STREAK_SCAN_DAYS {
        let day = compute_daily_stats(shift_days(now, -i), food_entries, water_entries, settings);
        if day.is_on_target() {
            temp_streak += 1;
            if i < WEEK_DAYS {
                current_streak = temp_streak;
            }
        } else {
            longest_streak = longest_streak.max(temp_streak);
            temp_streak = 0;
        }
    }
    longest_streak = longest_streak.max(temp_streak);

    let week = compute_weekly_stats(now, food_entries, water_entries, settings);
    let total_days = week.len() as u32;
    let calories: u64 = week.iter().map(|d| u64::from(d.total_calories)).sum();
    let weekly_average = if total_days == 0 {
        0
    } else {
        (calories / u64::from(total_days)) as u32
    };
    let days_on_target = week.iter().filter(|d| d.is_on_target()).count() as u32;

    debug!(
        current_streak,
        longest_streak,
        weekly_average,
        days_on_target,
        "computed weekly progress"
    );

    WeeklyProgress {
        current_streak,
        longest_streak,
        weekly_average,
        days_on_target,
        total_days,
    }
}

/// Per-day averages over an already computed window; zeros for an empty window.
pub fn compute_weekly_averages(week: &[DailyStats]) -> WeeklyAverages {
    if week.is_empty() {
        return WeeklyAverages::default();
    }
    let n = week.len();
    let calories: u64 = week.iter().map(|d| u64::from(d.total_calories)).sum();
    let water: u64 = week.iter().map(|d| u64::from(d.total_water)).sum();

    WeeklyAverages {
        calories: (calories / n as u64) as u32,
        protein: week.iter().map(|d| d.total_protein).sum::<f64>() / n as f64,
        carbs: week.iter().map(|d| d.total_carbs).sum::<f64>() / n as f64,
        fat: week.iter().map(|d| d.total_fat).sum::<f64>() / n as f64,
        water: (water / n as u64) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::{MealType, NewFoodEntry};
    use crate::time::{end_of_day, start_of_day};
    use chrono::{Local, TimeZone};

    fn local_at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn now() -> Timestamp {
        local_at(2024, 6, 15, 12)
    }

    fn food(calories: u32, timestamp: Timestamp) -> FoodEntry {
        FoodEntry::new(
            NewFoodEntry {
                name: "Meal".to_string(),
                calories,
                protein: 10.0,
                carbs: 20.0,
                fat: 5.0,
                serving_size: String::new(),
                meal_type: MealType::Lunch,
            },
            timestamp,
        )
    }

    fn target(calories: u32) -> UserSettings {
        UserSettings {
            daily_calorie_target: calories,
            ..UserSettings::default()
        }
    }

    /// One entry of `calories` on each of the given days back from `now`.
    fn history(days_back: impl IntoIterator<Item = i64>, calories: u32) -> Vec<FoodEntry> {
        days_back
            .into_iter()
            .map(|i| food(calories, shift_days(now(), -i)))
            .collect()
    }

    #[test]
    fn test_daily_stats_sums_todays_entries() {
        let entries = vec![
            food(500, local_at(2024, 6, 15, 8)),
            food(700, local_at(2024, 6, 15, 13)),
            food(900, local_at(2024, 6, 14, 13)),
        ];
        let water = vec![
            WaterEntry::new(250, local_at(2024, 6, 15, 9)),
            WaterEntry::new(500, local_at(2024, 6, 15, 18)),
            WaterEntry::new(1000, local_at(2024, 6, 16, 9)),
        ];

        let stats = compute_daily_stats(now(), &entries, &water, &target(2000));
        assert_eq!(stats.date, now());
        assert_eq!(stats.total_calories, 1200);
        assert_eq!(stats.total_protein, 20.0);
        assert_eq!(stats.total_carbs, 40.0);
        assert_eq!(stats.total_fat, 10.0);
        assert_eq!(stats.total_water, 750);
        assert_eq!(stats.entries.len(), 2);
        assert_eq!(stats.water_entries.len(), 2);
        assert_eq!(stats.target, 2000);
        assert!(stats.is_on_target());
    }

    #[test]
    fn test_daily_window_is_inclusive_at_both_ends() {
        let start = start_of_day(now());
        let end = end_of_day(now());
        let at_midnight = food(100, start);
        let last_milli = food(200, end);
        let next_day = food(400, end + 1);
        let before = food(800, start - 1);
        let entries = vec![before, at_midnight.clone(), last_milli.clone(), next_day];

        let stats = compute_daily_stats(now(), &entries, &[], &target(2000));
        assert_eq!(stats.entries, vec![at_midnight, last_milli]);
        assert_eq!(stats.total_calories, 300);
    }

    #[test]
    fn test_empty_day_is_all_zero() {
        let stats = compute_daily_stats(now(), &[], &[], &target(1800));
        assert_eq!(stats.total_calories, 0);
        assert_eq!(stats.total_protein, 0.0);
        assert_eq!(stats.total_water, 0);
        assert!(stats.entries.is_empty());
        assert_eq!(stats.target, 1800);
        assert!(!stats.is_on_target());
    }

    #[test]
    fn test_daily_totals_saturate() {
        // Records built directly skip the per-entry cap, as hand-edited files would.
        let huge = |ts| FoodEntry {
            calories: 3_000_000_000,
            ..food(1, ts)
        };
        let entries = vec![huge(now()), huge(now())];
        let water = vec![
            WaterEntry::new(u32::MAX, now()),
            WaterEntry::new(500, now()),
        ];

        let stats = compute_daily_stats(now(), &entries, &water, &target(2000));
        assert_eq!(stats.total_calories, u32::MAX);
        assert_eq!(stats.total_water, u32::MAX);
        assert!(!stats.is_on_target());
        assert_eq!(stats.calories_by_meal()[&MealType::Lunch], u32::MAX);

        let progress = compute_weekly_progress(now(), &entries, &water, &target(2000));
        assert_eq!(progress.weekly_average, u32::MAX / 7);
        assert_eq!(progress.current_streak, 0);
    }

    #[test]
    fn test_target_reflects_current_settings() {
        let entries = history([3], 1900);
        let day = shift_days(now(), -3);
        assert!(compute_daily_stats(day, &entries, &[], &target(2000)).is_on_target());
        assert!(!compute_daily_stats(day, &entries, &[], &target(1500)).is_on_target());
    }

    #[test]
    fn test_weekly_stats_ordering() {
        let entries = history(0..7, 100);
        let week = compute_weekly_stats(now(), &entries, &[], &target(2000));
        assert_eq!(week.len(), 7);
        for pair in week.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(week[0].date, shift_days(now(), -6));
        assert_eq!(
            week[6],
            compute_daily_stats(now(), &entries, &[], &target(2000))
        );
    }

    #[test]
    fn test_weekly_stats_is_idempotent() {
        let entries = history([0, 2, 5], 800);
        let settings = target(2000);
        assert_eq!(
            compute_weekly_stats(now(), &entries, &[], &settings),
            compute_weekly_stats(now(), &entries, &[], &settings)
        );
        assert_eq!(
            compute_weekly_progress(now(), &entries, &[], &settings),
            compute_weekly_progress(now(), &entries, &[], &settings)
        );
    }

    #[test]
    fn test_progress_empty_history() {
        let progress = compute_weekly_progress(now(), &[], &[], &target(2000));
        assert_eq!(
            progress,
            WeeklyProgress {
                current_streak: 0,
                longest_streak: 0,
                weekly_average: 0,
                days_on_target: 0,
                total_days: 7,
            }
        );
    }

    #[test]
    fn test_progress_every_day_qualifies() {
        let entries = history(0..30, 1500);
        let progress = compute_weekly_progress(now(), &entries, &[], &target(2000));
        assert_eq!(progress.longest_streak, 30);
        assert_eq!(progress.current_streak, 7);
        assert_eq!(progress.days_on_target, 7);
        assert_eq!(progress.weekly_average, 1500);
        assert_eq!(progress.total_days, 7);
    }

    #[test]
    fn test_current_streak_survives_missed_today() {
        let entries = history(1..7, 1200);
        let progress = compute_weekly_progress(now(), &entries, &[], &target(2000));
        assert_eq!(progress.current_streak, 6);
        assert_eq!(progress.longest_streak, 6);
        assert_eq!(progress.days_on_target, 6);
    }

    #[test]
    fn test_over_target_breaks_streak() {
        let mut entries = history([0, 1, 3, 4, 5], 1000);
        entries.extend(history([2], 2500));
        let progress = compute_weekly_progress(now(), &entries, &[], &target(2000));
        // Runs: days 0-1 (2), day 2 over, days 3-5 (3).
        assert_eq!(progress.current_streak, 3);
        assert_eq!(progress.longest_streak, 3);
        assert_eq!(progress.days_on_target, 5);
        assert_eq!(progress.weekly_average, (5 * 1000 + 2500) / 7);
    }

    #[test]
    fn test_streak_older_than_a_week_only_counts_as_longest() {
        let entries = history(10..22, 900);
        let progress = compute_weekly_progress(now(), &entries, &[], &target(2000));
        assert_eq!(progress.current_streak, 0);
        assert_eq!(progress.longest_streak, 12);
        assert_eq!(progress.days_on_target, 0);
        assert_eq!(progress.weekly_average, 0);
    }

    #[test]
    fn test_streak_running_to_end_of_scan_is_closed_out() {
        let entries = history(25..40, 900);
        let progress = compute_weekly_progress(now(), &entries, &[], &target(2000));
        assert_eq!(progress.longest_streak, 5);
    }

    #[test]
    fn test_weekly_average_truncates() {
        let entries = history([0], 1000);
        let progress = compute_weekly_progress(now(), &entries, &[], &target(2000));
        assert_eq!(progress.weekly_average, 142);
    }

    #[test]
    fn test_weekly_averages() {
        let entries = history([0, 1], 700);
        let water = vec![WaterEntry::new(1400, now())];
        let week = compute_weekly_stats(now(), &entries, &water, &target(2000));
        let averages = compute_weekly_averages(&week);
        assert_eq!(averages.calories, 200);
        assert_eq!(averages.water, 200);
        assert!((averages.protein - 20.0 / 7.0).abs() < 1e-9);
        assert_eq!(compute_weekly_averages(&[]), WeeklyAverages::default());
    }
}
