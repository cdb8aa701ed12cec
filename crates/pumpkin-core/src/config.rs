//! Configuration loading and typed config structures for a game session.
//!
//! The canonical configuration lives in `pumpkin-config.yaml` at the project
//! root. Every section and field is optional; anything missing falls back to
//! the defaults below, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use pumpkin_farm::{FarmConfig, FarmError};

/// Environment variable that overrides `save.path`.
pub const SAVE_PATH_ENV: &str = "PUMPKIN_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The farm section describes an unplayable farm.
    #[error("farm config: {source}")]
    Farm {
        /// The underlying farm validation error.
        #[from]
        source: FarmError,
    },

    /// A value outside the farm section is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `pumpkin-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Grid size, starting seeds, and harvest streak tuning.
    #[serde(default)]
    pub farm: FarmConfig,

    /// Growth tick, autosave, and run bounds.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Coin balances.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Save file location.
    #[serde(default)]
    pub save: SaveConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PUMPKIN_SAVE_PATH`, when set, overrides `save.path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from a YAML string. No overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Override values from an environment-like lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(SAVE_PATH_ENV).filter(|p| !p.is_empty()) {
            self.save.path = PathBuf::from(path);
        }
    }

    /// Reject configurations that cannot run a game.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Farm`] for an invalid farm section and
    /// [`ConfigError::Invalid`] for a zero growth tick interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.farm.validate()?;
        if self.timing.growth_tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "timing.growth_tick_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Scheduler timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Real milliseconds between growth ticks.
    #[serde(default = "default_growth_tick_interval_ms")]
    pub growth_tick_interval_ms: u64,

    /// Real milliseconds between autosaves. 0 disables autosave.
    #[serde(default = "default_autosave_interval_ms")]
    pub autosave_interval_ms: u64,

    /// Stop after this many growth ticks. 0 runs until shutdown.
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            growth_tick_interval_ms: default_growth_tick_interval_ms(),
            autosave_interval_ms: default_autosave_interval_ms(),
            max_ticks: 0,
        }
    }
}

/// Economy parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Coins held by a fresh game.
    #[serde(default)]
    pub starting_coins: u64,
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveConfig {
    /// Path of the JSON save file.
    #[serde(default = "default_save_path")]
    pub path: PathBuf,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            path: default_save_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_growth_tick_interval_ms() -> u64 {
    2_000
}

const fn default_autosave_interval_ms() -> u64 {
    10_000
}

fn default_save_path() -> PathBuf {
    PathBuf::from("pumpkin-save.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pumpkin_types::CropType;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.farm.grid_size, 8);
        assert_eq!(config.timing.growth_tick_interval_ms, 2_000);
        assert_eq!(config.timing.autosave_interval_ms, 10_000);
        assert_eq!(config.timing.max_ticks, 0);
        assert_eq!(config.economy.starting_coins, 0);
        assert_eq!(config.save.path, PathBuf::from("pumpkin-save.json"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
farm:
  grid_size: 6
  starting_seeds: 4
  default_crop: wheat
  streak_window_ms: 8000
  streak_threshold: 3
  catch_up_growth: true

timing:
  growth_tick_interval_ms: 500
  autosave_interval_ms: 0
  max_ticks: 100

economy:
  starting_coins: 25

save:
  path: "saves/farm.json"

logging:
  level: "debug"
  json: true
"#;
        let config = GameConfig::parse(yaml).unwrap();

        assert_eq!(config.farm.grid_size, 6);
        assert_eq!(config.farm.default_crop, CropType::Wheat);
        assert_eq!(config.farm.streak_threshold, 3);
        assert!(config.farm.catch_up_growth);
        assert_eq!(config.timing.growth_tick_interval_ms, 500);
        assert_eq!(config.timing.autosave_interval_ms, 0);
        assert_eq!(config.timing.max_ticks, 100);
        assert_eq!(config.economy.starting_coins, 25);
        assert_eq!(config.save.path, PathBuf::from("saves/farm.json"));
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = GameConfig::parse("farm:\n  grid_size: 3\n").unwrap();

        // Grid size is overridden
        assert_eq!(config.farm.grid_size, 3);
        // Everything else uses defaults
        assert_eq!(config.farm.starting_seeds, 10);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(GameConfig::parse("").unwrap(), GameConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = GameConfig::parse("farm: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn validate_rejects_zero_values() {
        let zero_grid = GameConfig::parse("farm:\n  grid_size: 0\n").unwrap();
        assert!(matches!(
            zero_grid.validate(),
            Err(ConfigError::Farm { .. })
        ));

        let zero_tick = GameConfig::parse("timing:\n  growth_tick_interval_ms: 0\n").unwrap();
        assert!(matches!(
            zero_tick.validate(),
            Err(ConfigError::Invalid { .. })
        ));

        let zero_streak = GameConfig::parse("farm:\n  streak_threshold: 0\n").unwrap();
        assert!(zero_streak.validate().is_err());
    }

    #[test]
    fn save_path_override() {
        let mut config = GameConfig::default();
        config.apply_overrides(|key| (key == SAVE_PATH_ENV).then(|| "/tmp/other.json".to_owned()));
        assert_eq!(config.save.path, PathBuf::from("/tmp/other.json"));

        // Empty values are ignored.
        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.save.path, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("pumpkin-config.yaml");
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
