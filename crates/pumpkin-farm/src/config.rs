//! Tunable parameters for the farm grid engine.
//!
//! These values correspond to the `farm` key of `pumpkin-config.yaml`. The
//! session layer deserializes them there and passes a [`FarmConfig`] into
//! [`FarmGrid::new`](crate::FarmGrid::new); tests override fields directly.

use serde::Deserialize;

use pumpkin_types::CropType;

use crate::error::FarmError;

/// Configuration for the farm grid and harvest streaks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FarmConfig {
    /// Width and height of the square grid (default: 8).
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,

    /// Seeds of the default crop granted on reset (default: 10).
    #[serde(default = "default_starting_seeds")]
    pub starting_seeds: u32,

    /// Crop type unlocked and selected on reset (default: pumpkin).
    #[serde(default = "default_crop")]
    pub default_crop: CropType,

    /// Maximum gap between harvests that keeps a streak alive (default: 10 s).
    #[serde(default = "default_streak_window_ms")]
    pub streak_window_ms: i64,

    /// Consecutive harvests that earn the mass-harvest bonus (default: 5).
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold: u32,

    /// Advance several stages in one tick when several stage durations have
    /// elapsed (default: false, one stage per tick).
    #[serde(default)]
    pub catch_up_growth: bool,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            starting_seeds: default_starting_seeds(),
            default_crop: default_crop(),
            streak_window_ms: default_streak_window_ms(),
            streak_threshold: default_streak_threshold(),
            catch_up_growth: false,
        }
    }
}

impl FarmConfig {
    /// Check that the configuration describes a playable farm.
    ///
    /// # Errors
    ///
    /// Returns [`FarmError::InvalidConfig`] for an empty grid, a
    /// non-positive streak window, or a zero streak threshold.
    pub fn validate(&self) -> Result<(), FarmError> {
        if self.grid_size == 0 {
            return Err(FarmError::InvalidConfig {
                reason: "grid_size must be at least 1".to_owned(),
            });
        }
        if self.grid_size.checked_mul(self.grid_size).is_none() {
            return Err(FarmError::InvalidConfig {
                reason: format!("grid_size {} is too large", self.grid_size),
            });
        }
        if self.streak_window_ms <= 0 {
            return Err(FarmError::InvalidConfig {
                reason: "streak_window_ms must be positive".to_owned(),
            });
        }
        if self.streak_threshold == 0 {
            return Err(FarmError::InvalidConfig {
                reason: "streak_threshold must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

const fn default_grid_size() -> usize {
    8
}

const fn default_starting_seeds() -> u32 {
    10
}

const fn default_crop() -> CropType {
    CropType::Pumpkin
}

const fn default_streak_window_ms() -> i64 {
    10_000
}

const fn default_streak_threshold() -> u32 {
    5
}
