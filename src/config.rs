// Pipeline settings
// Persisted as settings.json in the data directory. Missing keys fall back to constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DATA_FOLDER, DEFAULT_MIN_RATIO, DEFAULT_SAMPLE_COUNT, DEFAULT_TOP_COUNT, PLATFORM_TOP_COUNT,
    SETTINGS_FILENAME,
};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Viral threshold applied per platform and again to the combined pool
    pub min_ratio: f64,
    /// Size of the daily cross-platform ranking
    pub top_count: usize,
    /// Size of each platform's viral file
    pub platform_top_count: usize,
    /// Fill an empty run with synthetic videos
    pub generate_samples: bool,
    pub sample_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_ratio: DEFAULT_MIN_RATIO,
            top_count: DEFAULT_TOP_COUNT,
            platform_top_count: PLATFORM_TOP_COUNT,
            generate_samples: false,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl Settings {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILENAME)
    }

    /// Load settings from the data directory. A missing file yields defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(data_dir)?;
        let path = Self::path(data_dir);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

/// Default data directory: ~/.viralrank
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.home_dir().join(DATA_FOLDER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(Settings::load(tmp.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(Settings::path(tmp.path()), r#"{"minRatio": 3.5, "generateSamples": true}"#).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.min_ratio, 3.5);
        assert!(settings.generate_samples);
        assert_eq!(settings.top_count, DEFAULT_TOP_COUNT);
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings { top_count: 25, ..Settings::default() };
        settings.save(tmp.path()).unwrap();

        assert_eq!(Settings::load(tmp.path()).unwrap(), settings);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(Settings::path(tmp.path()), "min_ratio = 2").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }
}
