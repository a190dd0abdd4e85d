pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::ValidationError;
pub use model::entry::{FoodEntry, MealType, NewFoodEntry, Timestamp, WaterEntry};
pub use model::settings::{ActivityLevel, Gender, UserSettings};
pub use model::stats::{DailyStats, WeeklyAverages, WeeklyProgress};
pub use repository::{FileEntryRepository, FileSettingsRepository};
pub use service::body_metrics::{calculate_bmi, calculate_bmr, calculate_tdee, BmiCategory, BodyProfile};
pub use service::entry_service::EntryService;
pub use service::events::{drain_changes, ChangeEvent, ChangeNotifier, ChangeReceiver};
pub use service::insights::{Insight, InsightLevel};
pub use service::settings_service::SettingsService;
pub use service::stats_service::{compute_daily_stats, compute_weekly_progress, compute_weekly_stats};
pub use usecase::dashboard::{Dashboard, DashboardUseCase, Snapshot};
pub use usecase::history::{DayGroup, HistoryFilter, HistoryUseCase};
