use crate::model::entry::{FoodEntry, WaterEntry};
use crate::model::settings::UserSettings;
use anyhow::Result;

/// Food log in insertion order. Entries are immutable once stored.
pub trait FoodEntryRepository {
    fn create(&self, entry: FoodEntry) -> Result<FoodEntry>;
    fn list(&self) -> Result<Vec<FoodEntry>>;
    /// Returns `false` when no entry had that id.
    fn delete(&self, id: &str) -> Result<bool>;
}

pub trait WaterEntryRepository {
    fn create(&self, entry: WaterEntry) -> Result<WaterEntry>;
    fn list(&self) -> Result<Vec<WaterEntry>>;
}

pub trait SettingsRepository {
    fn get(&self) -> Result<UserSettings>;
    fn save(&self, settings: &UserSettings) -> Result<()>;
}
