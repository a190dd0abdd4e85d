use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

const DATA_DIR_ENV: &str = "CALIO_DATA_DIR";
const LOG_ENV: &str = "CALIO_LOG";
const DEFAULT_LOG_FILTER: &str = "calio=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = match env::var(DATA_DIR_ENV).ok().filter(|s| !s.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let log_filter = env::var(LOG_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            data_dir,
            log_filter,
        })
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

/// `~/.calio`
pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".calio"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/a"),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        };
        let overridden = config.clone().with_data_dir(Some(PathBuf::from("/tmp/b")));
        assert_eq!(overridden.data_dir, PathBuf::from("/tmp/b"));
        assert_eq!(config.clone().with_data_dir(None), config);
    }
}
