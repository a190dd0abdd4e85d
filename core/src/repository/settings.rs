use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::default_data_dir;
use crate::model::settings::UserSettings;
use crate::repository::traits::SettingsRepository;

const SETTINGS_FILE_NAME: &str = "settings.json";

pub struct FileSettingsRepository {
    file_path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)?;
        path.push(SETTINGS_FILE_NAME);

        Ok(FileSettingsRepository { file_path: path })
    }
}

impl SettingsRepository for FileSettingsRepository {
    /// Defaults when nothing was saved yet or the stored record is unusable.
    fn get(&self) -> Result<UserSettings> {
        if !self.file_path.exists() {
            return Ok(UserSettings::default());
        }
        let content = fs::read_to_string(&self.file_path)?;
        let settings = match serde_json::from_str::<UserSettings>(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.file_path.display(), error = %e, "unreadable settings, using defaults");
                return Ok(UserSettings::default());
            }
        };
        if let Err(e) = settings.validate() {
            warn!(path = %self.file_path.display(), error = %e, "invalid settings, using defaults");
            return Ok(UserSettings::default());
        }
        Ok(settings)
    }

    fn save(&self, settings: &UserSettings) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, settings)?;
        writer.flush()?;
        info!(target_kcal = settings.daily_calorie_target, "saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::Gender;
    use crate::repository::file::tests::unique_dir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = unique_dir("settings_missing");
        let repo = FileSettingsRepository::new(Some(dir.clone())).unwrap();
        assert_eq!(repo.get().unwrap(), UserSettings::default());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_then_get() {
        let dir = unique_dir("settings_roundtrip");
        let repo = FileSettingsRepository::new(Some(dir.clone())).unwrap();
        let settings = UserSettings {
            daily_calorie_target: 1800,
            user_name: "Sam".to_string(),
            gender: Gender::Female,
            ..UserSettings::default()
        };
        repo.save(&settings).unwrap();
        assert_eq!(repo.get().unwrap(), settings);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_corrupt_or_invalid_file_yields_defaults() {
        let dir = unique_dir("settings_corrupt");
        let repo = FileSettingsRepository::new(Some(dir.clone())).unwrap();

        fs::write(dir.join(SETTINGS_FILE_NAME), "daily_target=2000|||").unwrap();
        assert_eq!(repo.get().unwrap(), UserSettings::default());

        fs::write(dir.join(SETTINGS_FILE_NAME), r#"{"dailyCalorieTarget":0}"#).unwrap();
        assert_eq!(repo.get().unwrap(), UserSettings::default());

        fs::remove_dir_all(dir).ok();
    }
}
