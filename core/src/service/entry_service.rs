use anyhow::Result;
use tracing::info;

use crate::error::ValidationError;
use crate::model::entry::{validate_water_amount, FoodEntry, NewFoodEntry, Timestamp, WaterEntry};
use crate::repository::{FoodEntryRepository, WaterEntryRepository};
use crate::service::events::{ChangeEvent, ChangeNotifier};
use crate::time::now_millis;

/// Validating front door to the food and water logs.
pub struct EntryService<F: FoodEntryRepository, W: WaterEntryRepository> {
    food_repo: F,
    water_repo: W,
    notifier: ChangeNotifier,
}

impl<F: FoodEntryRepository, W: WaterEntryRepository> EntryService<F, W> {
    pub fn new(food_repo: F, water_repo: W) -> Self {
        Self {
            food_repo,
            water_repo,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn add_food(&self, input: NewFoodEntry) -> Result<FoodEntry> {
        self.add_food_at(input, now_millis())
    }

    pub fn add_food_at(&self, input: NewFoodEntry, timestamp: Timestamp) -> Result<FoodEntry> {
        input.validate()?;
        let created = self.food_repo.create(FoodEntry::new(input, timestamp))?;
        info!(id = %created.id, name = %created.name, "logged food");
        self.notifier.notify(ChangeEvent::FoodEntriesChanged);
        Ok(created)
    }

    /// Removing an unknown id is not an error; the return value says whether anything changed.
    pub fn delete_food(&self, id: &str) -> Result<bool> {
        if id.trim().is_empty() {
            return Err(ValidationError::BlankEntryId.into());
        }
        let removed = self.food_repo.delete(id)?;
        if removed {
            self.notifier.notify(ChangeEvent::FoodEntriesChanged);
        }
        Ok(removed)
    }

    pub fn add_water(&self, amount: u32) -> Result<WaterEntry> {
        self.add_water_at(amount, now_millis())
    }

    pub fn add_water_at(&self, amount: u32, timestamp: Timestamp) -> Result<WaterEntry> {
        validate_water_amount(amount)?;
        let created = self.water_repo.create(WaterEntry::new(amount, timestamp))?;
        info!(id = %created.id, amount, "logged water");
        self.notifier.notify(ChangeEvent::WaterEntriesChanged);
        Ok(created)
    }

    pub fn food_entries(&self) -> Result<Vec<FoodEntry>> {
        self.food_repo.list()
    }

    pub fn water_entries(&self) -> Result<Vec<WaterEntry>> {
        self.water_repo.list()
    }
}
