//! Core data structs for the Pumpkin Patch farming game.
//!
//! Covers the farm data model (`Crop`, `Plot`, `PlayerInventory`) and the
//! read models handed to the UI by the progression engine (`XpGain`,
//! `XpAward`, `LevelProgress`) and the farm engine (`StageCounts`).
//!
//! Field names serialize in `camelCase` so save files stay compatible with
//! the browser client.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActivityId, CropType, GrowthStage};

// ---------------------------------------------------------------------------
// Crop and Plot
// ---------------------------------------------------------------------------

/// A single planted crop, owned exclusively by its plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Crop {
    /// What was planted.
    pub crop_type: CropType,
    /// Current lifecycle stage. Only ever advances.
    pub stage: GrowthStage,
    /// Milliseconds since the Unix epoch when planted. Immutable.
    #[ts(type = "number")]
    pub planted_time: i64,
    /// Milliseconds since the Unix epoch of the last stage transition.
    #[ts(type = "number")]
    pub last_growth_time: i64,
}

impl Crop {
    /// Create a crop at [`GrowthStage::Seed`] planted at `now_ms`.
    pub const fn seed(crop_type: CropType, now_ms: i64) -> Self {
        Self {
            crop_type,
            stage: GrowthStage::Seed,
            planted_time: now_ms,
            last_growth_time: now_ms,
        }
    }
}

/// A single cell of the farm grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Plot {
    /// The crop growing here, if any.
    pub crop: Option<Crop>,
}

impl Plot {
    /// Whether nothing is planted here.
    pub const fn is_empty(&self) -> bool {
        self.crop.is_none()
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Seeds, harvested produce, and unlock state for each crop type.
///
/// Missing map entries read as zero (or locked). Unlock flags only ever move
/// from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlayerInventory {
    /// Seeds available to plant.
    #[serde(default)]
    pub seeds: BTreeMap<CropType, u32>,
    /// Harvested produce available to sell.
    #[serde(default)]
    pub harvested_crops: BTreeMap<CropType, u32>,
    /// Which crop types may be planted or bought.
    #[serde(default)]
    pub unlocked_crops: BTreeMap<CropType, bool>,
    /// Default crop type for planting.
    pub selected_crop_type: CropType,
}

impl PlayerInventory {
    /// Seeds held for `crop`.
    pub fn seeds_of(&self, crop: CropType) -> u32 {
        self.seeds.get(&crop).copied().unwrap_or(0)
    }

    /// Harvested produce held for `crop`.
    pub fn harvested_of(&self, crop: CropType) -> u32 {
        self.harvested_crops.get(&crop).copied().unwrap_or(0)
    }

    /// Whether `crop` has been unlocked.
    pub fn is_unlocked(&self, crop: CropType) -> bool {
        self.unlocked_crops.get(&crop).copied().unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Stage counts
// ---------------------------------------------------------------------------

/// Number of crops in each growth stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StageCounts {
    /// Crops at [`GrowthStage::Seed`].
    pub seed: u32,
    /// Crops at [`GrowthStage::Sprout`].
    pub sprout: u32,
    /// Crops at [`GrowthStage::Growing`].
    pub growing: u32,
    /// Crops at [`GrowthStage::Mature`].
    pub mature: u32,
}

impl StageCounts {
    /// Count for a single stage.
    pub const fn get(&self, stage: GrowthStage) -> u32 {
        match stage {
            GrowthStage::Seed => self.seed,
            GrowthStage::Sprout => self.sprout,
            GrowthStage::Growing => self.growing,
            GrowthStage::Mature => self.mature,
        }
    }

    /// Add one to the count for `stage`.
    pub fn increment(&mut self, stage: GrowthStage) {
        let slot = match stage {
            GrowthStage::Seed => &mut self.seed,
            GrowthStage::Sprout => &mut self.sprout,
            GrowthStage::Growing => &mut self.growing,
            GrowthStage::Mature => &mut self.mature,
        };
        *slot = slot.saturating_add(1);
    }

    /// Total crops across all stages.
    pub const fn total(&self) -> u32 {
        self.seed
            .saturating_add(self.sprout)
            .saturating_add(self.growing)
            .saturating_add(self.mature)
    }
}

// ---------------------------------------------------------------------------
// Progression read models
// ---------------------------------------------------------------------------

/// A single recent XP gain, kept for transient UI notifications only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct XpGain {
    /// Which catalog activity earned the XP.
    pub activity: ActivityId,
    /// XP actually credited after the multiplier.
    #[ts(type = "number")]
    pub amount: u64,
    /// Milliseconds since the Unix epoch when the gain happened.
    #[ts(type = "number")]
    pub timestamp: i64,
}

/// Outcome of a single XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct XpAward {
    /// XP credited.
    #[ts(type = "number")]
    pub gained: u64,
    /// Whether the award crossed at least one level threshold.
    pub leveled_up: bool,
    /// Level after the award.
    pub new_level: u32,
}

/// Progress through the current level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LevelProgress {
    /// XP earned within the current level.
    #[ts(type = "number")]
    pub current: u64,
    /// XP required to finish the current level.
    #[ts(type = "number")]
    pub needed: u64,
    /// `current / needed * 100`, capped at 100.
    pub percentage: f64,
}
