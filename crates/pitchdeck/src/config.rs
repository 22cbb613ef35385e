use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::navigator::DEFAULT_TRANSITION;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "pitchdeck";

pub const VALID_KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.transition_ms",
    "defaults.start_slide",
    "defaults.font",
    "audio.volume",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Settle time after each slide change, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<u64>,

    /// 1-indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,

    /// Font file tried before the built-in fonts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `pitchdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# pitchdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme_name(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("light")
    }

    pub fn transition(&self) -> Duration {
        self.defaults
            .as_ref()
            .and_then(|d| d.transition_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TRANSITION)
    }

    pub fn start_slide(&self) -> Option<usize> {
        self.defaults.as_ref().and_then(|d| d.start_slide)
    }

    pub fn font(&self) -> Option<&Path> {
        self.defaults.as_ref().and_then(|d| d.font.as_deref())
    }

    pub fn volume(&self) -> f32 {
        self.audio.as_ref().and_then(|a| a.volume).unwrap_or(1.0)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.transition_ms" => {
                let ms = value
                    .parse::<u64>()
                    .ok()
                    .filter(|ms| (100..=5000).contains(ms))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid transition_ms: {value}. Must be a number between 100 and 5000."
                        )
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .transition_ms = Some(ms);
            }
            "defaults.start_slide" => {
                let slide = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid start_slide: {value}. Must be a slide number (1 or higher)."
                        )
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(slide);
            }
            "defaults.font" => {
                let path = PathBuf::from(value);
                if !path.is_file() {
                    anyhow::bail!("Font file not found: {value}");
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .font = Some(path);
            }
            "audio.volume" => {
                let volume = value
                    .parse::<f32>()
                    .ok()
                    .filter(|v| (0.0..=1.0).contains(v))
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid volume: {value}. Must be between 0.0 and 1.0.")
                    })?;
                self.audio.get_or_insert_with(AudioConfig::default).volume = Some(volume);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.theme_name(), "light");
        assert_eq!(config.transition(), Duration::from_millis(1000));
        assert_eq!(config.start_slide(), None);
        assert_eq!(config.volume(), 1.0);
        assert!(config.font().is_none());
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("defaults.transition_ms", "600").unwrap();
        config.set("defaults.start_slide", "3").unwrap();
        config.set("audio.volume", "0.5").unwrap();
        assert_eq!(config.theme_name(), "dark");
        assert_eq!(config.transition(), Duration::from_millis(600));
        assert_eq!(config.start_slide(), Some(3));
        assert_eq!(config.volume(), 0.5);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.transition_ms", "50").is_err());
        assert!(config.set("defaults.transition_ms", "fast").is_err());
        assert!(config.set("defaults.start_slide", "0").is_err());
        assert!(config.set("defaults.font", "/no/such/font.ttf").is_err());
        assert!(config.set("audio.volume", "1.5").is_err());
        assert!(config.set("defaults.aspect", "16:9").is_err());
        assert!(config.defaults.is_none());
        assert!(config.audio.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("pitchdeck-config-{}", std::process::id()));
        let path = dir.join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.theme", "dark").unwrap();
        config.set("audio.volume", "0.25").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme_name(), "dark");
        assert_eq!(loaded.volume(), 0.25);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_hint() {
        let err = Config::load_from(Path::new("/nonexistent/pitchdeck.yaml")).unwrap_err();
        assert!(err.to_string().contains("config show"));
    }
}
