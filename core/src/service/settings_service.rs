use anyhow::Result;
use tracing::info;

use crate::model::settings::UserSettings;
use crate::repository::SettingsRepository;
use crate::service::events::{ChangeEvent, ChangeNotifier};

pub struct SettingsService<R: SettingsRepository> {
    repo: R,
    notifier: ChangeNotifier,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn settings(&self) -> Result<UserSettings> {
        self.repo.get()
    }

    /// Replaces the stored record wholesale.
    pub fn update(&self, settings: UserSettings) -> Result<UserSettings> {
        settings.validate()?;
        self.repo.save(&settings)?;
        info!(user = %settings.user_name, "updated settings");
        self.notifier.notify(ChangeEvent::SettingsChanged);
        Ok(settings)
    }
}
