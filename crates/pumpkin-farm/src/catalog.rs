//! Crop catalog: the per-crop-type constants that drive growth and the shop.
//!
//! Each [`CropType`] maps to exactly one [`CropSpec`]. The lookup is an
//! exhaustive `match`, so a new crop type cannot compile without its row.
//!
//! | Crop    | ms / stage | Refund | Seed price | Sell price | Unlock level | Unlock cost |
//! |---------|------------|--------|------------|------------|--------------|-------------|
//! | pumpkin | 5000       | 2      | 5          | 10         | 1            | 0           |
//! | wheat   | 3000       | 1      | 2          | 4          | 2            | 50          |
//! | corn    | 8000       | 1      | 8          | 18         | 3            | 120         |

use pumpkin_types::CropType;

/// Static properties of a crop type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    /// Real milliseconds spent in each non-mature stage.
    pub growth_time_per_stage_ms: i64,
    /// Seeds credited back on harvest.
    pub seed_refund: u32,
    /// Coins per seed in the shop.
    pub seed_price: u64,
    /// Coins received per harvested crop sold.
    pub sell_price: u64,
    /// Player level required to buy the unlock.
    pub unlock_level: u32,
    /// Coins charged to unlock the crop type.
    pub unlock_cost: u64,
}

const PUMPKIN: CropSpec = CropSpec {
    growth_time_per_stage_ms: 5_000,
    seed_refund: 2,
    seed_price: 5,
    sell_price: 10,
    unlock_level: 1,
    unlock_cost: 0,
};

const WHEAT: CropSpec = CropSpec {
    growth_time_per_stage_ms: 3_000,
    seed_refund: 1,
    seed_price: 2,
    sell_price: 4,
    unlock_level: 2,
    unlock_cost: 50,
};

const CORN: CropSpec = CropSpec {
    growth_time_per_stage_ms: 8_000,
    seed_refund: 1,
    seed_price: 8,
    sell_price: 18,
    unlock_level: 3,
    unlock_cost: 120,
};

/// Look up the catalog row for a crop type.
pub const fn crop_spec(crop: CropType) -> &'static CropSpec {
    match crop {
        CropType::Pumpkin => &PUMPKIN,
        CropType::Wheat => &WHEAT,
        CropType::Corn => &CORN,
    }
}
