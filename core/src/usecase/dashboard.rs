use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::model::entry::{FoodEntry, Timestamp, WaterEntry};
use crate::model::settings::UserSettings;
use crate::model::stats::{DailyStats, WeeklyAverages, WeeklyProgress};
use crate::repository::{FoodEntryRepository, SettingsRepository, WaterEntryRepository};
use crate::service::body_metrics::BodyProfile;
use crate::service::insights::{generate_insights, Insight};
use crate::service::stats_service::{
    compute_daily_stats, compute_weekly_averages, compute_weekly_progress, compute_weekly_stats,
};

/// Entries and settings read once, so every figure derived from it agrees.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub food: Vec<FoodEntry>,
    pub water: Vec<WaterEntry>,
    pub settings: UserSettings,
}

impl Snapshot {
    pub fn daily(&self, instant: Timestamp) -> DailyStats {
        compute_daily_stats(instant, &self.food, &self.water, &self.settings)
    }

    pub fn weekly(&self, now: Timestamp) -> Vec<DailyStats> {
        compute_weekly_stats(now, &self.food, &self.water, &self.settings)
    }

    pub fn progress(&self, now: Timestamp) -> WeeklyProgress {
        compute_weekly_progress(now, &self.food, &self.water, &self.settings)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Dashboard {
    pub today: DailyStats,
    pub week: Vec<DailyStats>,
    pub progress: WeeklyProgress,
    pub averages: WeeklyAverages,
    pub insights: Vec<Insight>,
    pub profile: BodyProfile,
    pub settings: UserSettings,
}

pub struct DashboardUseCase<'a, F, W, S>
where
    F: FoodEntryRepository,
    W: WaterEntryRepository,
    S: SettingsRepository,
{
    food_repo: &'a F,
    water_repo: &'a W,
    settings_repo: &'a S,
}

impl<'a, F, W, S> DashboardUseCase<'a, F, W, S>
where
    F: FoodEntryRepository,
    W: WaterEntryRepository,
    S: SettingsRepository,
{
    pub fn new(food_repo: &'a F, water_repo: &'a W, settings_repo: &'a S) -> Self {
        Self {
            food_repo,
            water_repo,
            settings_repo,
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        let snapshot = Snapshot {
            food: self.food_repo.list()?,
            water: self.water_repo.list()?,
            settings: self.settings_repo.get()?,
        };
        debug!(
            food = snapshot.food.len(),
            water = snapshot.water.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    pub fn dashboard(&self, now: Timestamp) -> Result<Dashboard> {
        Ok(build_dashboard(&self.snapshot()?, now))
    }
}

pub fn build_dashboard(snapshot: &Snapshot, now: Timestamp) -> Dashboard {
    let week = snapshot.weekly(now);
    let progress = snapshot.progress(now);
    let averages = compute_weekly_averages(&week);

    Dashboard {
        // The last day of the window is today's window.
        today: week
            .last()
            .cloned()
            .unwrap_or_else(|| snapshot.daily(now)),
        insights: generate_insights(&averages, &progress, &snapshot.settings),
        profile: BodyProfile::from_settings(&snapshot.settings),
        settings: snapshot.settings.clone(),
        week,
        progress,
        averages,
    }
}
