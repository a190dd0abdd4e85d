use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::default_data_dir;
use crate::error::ValidationResult;
use crate::model::entry::{FoodEntry, WaterEntry};
use crate::repository::traits::{FoodEntryRepository, WaterEntryRepository};

const FOOD_FILE_NAME: &str = "food_entries.json";
const WATER_FILE_NAME: &str = "water_entries.json";

/// Food and water logs stored as JSON arrays, one file each.
#[derive(Clone)]
pub struct FileEntryRepository {
    food_path: PathBuf,
    water_path: PathBuf,
}

impl FileEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&dir)?;

        let food_path = dir.join(FOOD_FILE_NAME);
        let water_path = dir.join(WATER_FILE_NAME);
        for path in [&food_path, &water_path] {
            if !path.exists() {
                write_records::<FoodEntry>(path, &[])?;
            }
        }

        Ok(FileEntryRepository {
            food_path,
            water_path,
        })
    }

    fn read_food(&self) -> Result<Vec<FoodEntry>> {
        read_records(&self.food_path, FoodEntry::validate)
    }

    fn read_water(&self) -> Result<Vec<WaterEntry>> {
        read_records(&self.water_path, WaterEntry::validate)
    }
}

/// Loads a JSON array, skipping elements that do not decode or validate.
fn read_records<T>(path: &Path, validate: fn(&T) -> ValidationResult) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let raw: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut records = Vec::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => match validate(&record) {
                Ok(()) => records.push(record),
                Err(e) => warn!(path = %path.display(), index, error = %e, "dropping invalid record"),
            },
            Err(e) => warn!(path = %path.display(), index, error = %e, "dropping malformed record"),
        }
    }
    Ok(records)
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

impl FoodEntryRepository for FileEntryRepository {
    fn create(&self, entry: FoodEntry) -> Result<FoodEntry> {
        let mut entries = self.read_food()?;
        entries.push(entry.clone());
        write_records(&self.food_path, &entries)?;
        info!(id = %entry.id, calories = entry.calories, "stored food entry");
        Ok(entry)
    }

    fn list(&self) -> Result<Vec<FoodEntry>> {
        self.read_food()
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.read_food()?;
        let initial_len = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == initial_len {
            return Ok(false);
        }

        write_records(&self.food_path, &entries)?;
        info!(id, "deleted food entry");
        Ok(true)
    }
}

impl WaterEntryRepository for FileEntryRepository {
    fn create(&self, entry: WaterEntry) -> Result<WaterEntry> {
        let mut entries = self.read_water()?;
        entries.push(entry.clone());
        write_records(&self.water_path, &entries)?;
        info!(id = %entry.id, amount = entry.amount, "stored water entry");
        Ok(entry)
    }

    fn list(&self) -> Result<Vec<WaterEntry>> {
        self.read_water()
    }
}
