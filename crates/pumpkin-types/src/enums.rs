//! Enumeration types for the Pumpkin Patch farming game.
//!
//! Every enum here is closed: adding a crop type or growth stage is a
//! compile-time change, and the catalog tables that key off these enums are
//! checked for exhaustiveness by `match`.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Crop Types
// ---------------------------------------------------------------------------

/// A kind of crop that can be planted on a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CropType {
    /// The starter crop, unlocked from the first session.
    Pumpkin,
    /// Fast-growing grain.
    Wheat,
    /// Slow-growing, high-value crop.
    Corn,
}

impl CropType {
    /// All crop types in catalog order.
    pub const ALL: [Self; 3] = [Self::Pumpkin, Self::Wheat, Self::Corn];

    /// Lowercase name used in save files and the UI.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pumpkin => "pumpkin",
            Self::Wheat => "wheat",
            Self::Corn => "corn",
        }
    }

    /// Parse a crop type from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|crop| crop.as_str() == name)
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Growth Stages
// ---------------------------------------------------------------------------

/// Lifecycle stage of a planted crop.
///
/// Stages are strictly ordered `Seed < Sprout < Growing < Mature`. A crop
/// only ever moves forward through this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GrowthStage {
    /// Freshly planted.
    Seed,
    /// First visible growth.
    Sprout,
    /// Intermediate growth.
    Growing,
    /// Ready to harvest. Terminal.
    Mature,
}

impl GrowthStage {
    /// All stages in growth order.
    pub const ALL: [Self; 4] = [Self::Seed, Self::Sprout, Self::Growing, Self::Mature];

    /// Zero-based position in the growth ordering.
    pub const fn index(self) -> usize {
        match self {
            Self::Seed => 0,
            Self::Sprout => 1,
            Self::Growing => 2,
            Self::Mature => 3,
        }
    }

    /// Stage at the given position, if in range.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Seed),
            1 => Some(Self::Sprout),
            2 => Some(Self::Growing),
            3 => Some(Self::Mature),
            _ => None,
        }
    }

    /// The following stage, or `None` for [`GrowthStage::Mature`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Seed => Some(Self::Sprout),
            Self::Sprout => Some(Self::Growing),
            Self::Growing => Some(Self::Mature),
            Self::Mature => None,
        }
    }

    /// Whether the crop can be harvested.
    pub const fn is_mature(self) -> bool {
        matches!(self, Self::Mature)
    }

    /// Lowercase name used in save files and the UI.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Sprout => "sprout",
            Self::Growing => "growing",
            Self::Mature => "mature",
        }
    }

    /// Parse a stage from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == name)
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// Broad category of an XP-earning activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActivityCategory {
    /// Planting seeds.
    Plant,
    /// Harvesting mature crops.
    Harvest,
    /// Repairing farm equipment.
    Repair,
    /// Exploring the farm and surroundings.
    Exploration,
    /// One-off or streak achievements.
    Achievement,
}

/// Identifier of an entry in the activity catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ActivityId {
    /// Plant any seed.
    PlantSeed,
    /// Harvest any mature crop.
    HarvestCrop,
    /// Complete an equipment repair.
    RepairEquipment,
    /// Plant the very first seed of a farm.
    FirstPlant,
    /// Harvest the very first crop of a farm.
    FirstHarvest,
    /// Harvest several crops in quick succession.
    MassHarvest,
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(GrowthStage::Seed < GrowthStage::Sprout);
        assert!(GrowthStage::Sprout < GrowthStage::Growing);
        assert!(GrowthStage::Growing < GrowthStage::Mature);
    }

    #[test]
    fn next_walks_to_mature_and_stops() {
        let mut stage = GrowthStage::Seed;
        let mut steps = 0;
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            steps += 1;
        }
        assert_eq!(stage, GrowthStage::Mature);
        assert_eq!(steps, 3);
    }

    #[test]
    fn index_round_trips() {
        for stage in GrowthStage::ALL {
            assert_eq!(GrowthStage::from_index(stage.index()), Some(stage));
        }
        assert_eq!(GrowthStage::from_index(4), None);
    }

    #[test]
    fn names_parse() {
        assert_eq!(CropType::from_name("pumpkin"), Some(CropType::Pumpkin));
        assert_eq!(CropType::from_name("turnip"), None);
        assert_eq!(GrowthStage::from_name("growing"), Some(GrowthStage::Growing));
        assert_eq!(GrowthStage::from_name("rotten"), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&CropType::Corn).unwrap_or_default();
        assert_eq!(json, "\"corn\"");
        let json = serde_json::to_string(&ActivityId::MassHarvest).unwrap_or_default();
        assert_eq!(json, "\"MASS_HARVEST\"");
    }
}
