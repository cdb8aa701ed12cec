//! Activity catalog: every way the player can earn XP.
//!
//! The catalog is static configuration data. Callers pass entries by
//! reference into [`ProgressionEngine::add_xp`](crate::ProgressionEngine::add_xp)
//! and never need to know the level formula.

use serde::Serialize;

use pumpkin_types::{ActivityCategory, ActivityId};

/// A named, fixed-value XP source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    /// Catalog identifier.
    pub id: ActivityId,
    /// Broad category, used by the UI for iconography.
    pub category: ActivityCategory,
    /// Display name.
    pub name: &'static str,
    /// XP granted at a 1x multiplier.
    pub base_xp: u32,
    /// Player-facing description.
    pub description: &'static str,
}

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// Planting any seed.
pub const PLANT_SEED: Activity = Activity {
    id: ActivityId::PlantSeed,
    category: ActivityCategory::Plant,
    name: "Plant Seed",
    base_xp: 5,
    description: "Plant a seed in the soil",
};

/// Harvesting any mature crop.
pub const HARVEST_CROP: Activity = Activity {
    id: ActivityId::HarvestCrop,
    category: ActivityCategory::Harvest,
    name: "Harvest Crop",
    base_xp: 15,
    description: "Harvest a fully grown crop",
};

/// Completing an equipment repair mini-game.
pub const REPAIR_EQUIPMENT: Activity = Activity {
    id: ActivityId::RepairEquipment,
    category: ActivityCategory::Repair,
    name: "Repair Equipment",
    base_xp: 25,
    description: "Successfully repair farm equipment",
};

/// The first seed ever planted on a farm.
pub const FIRST_PLANT: Activity = Activity {
    id: ActivityId::FirstPlant,
    category: ActivityCategory::Achievement,
    name: "First Sprout",
    base_xp: 50,
    description: "Plant your very first seed",
};

/// The first crop ever harvested on a farm.
pub const FIRST_HARVEST: Activity = Activity {
    id: ActivityId::FirstHarvest,
    category: ActivityCategory::Achievement,
    name: "First Harvest",
    base_xp: 100,
    description: "Harvest your first crop",
};

/// A streak of quick consecutive harvests.
pub const MASS_HARVEST: Activity = Activity {
    id: ActivityId::MassHarvest,
    category: ActivityCategory::Achievement,
    name: "Bountiful Harvest",
    base_xp: 75,
    description: "Harvest 5 crops in quick succession",
};

/// Every catalog entry.
pub const ACTIVITIES: [Activity; 6] = [
    PLANT_SEED,
    HARVEST_CROP,
    REPAIR_EQUIPMENT,
    FIRST_PLANT,
    FIRST_HARVEST,
    MASS_HARVEST,
];

/// Look up the catalog entry for an identifier.
pub const fn activity(id: ActivityId) -> &'static Activity {
    match id {
        ActivityId::PlantSeed => &PLANT_SEED,
        ActivityId::HarvestCrop => &HARVEST_CROP,
        ActivityId::RepairEquipment => &REPAIR_EQUIPMENT,
        ActivityId::FirstPlant => &FIRST_PLANT,
        ActivityId::FirstHarvest => &FIRST_HARVEST,
        ActivityId::MassHarvest => &MASS_HARVEST,
    }
}
