pub mod file;
pub mod settings;
pub mod traits;

pub use file::FileEntryRepository;
pub use settings::FileSettingsRepository;
pub use traits::{FoodEntryRepository, SettingsRepository, WaterEntryRepository};
