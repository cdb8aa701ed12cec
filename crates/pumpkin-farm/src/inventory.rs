//! Seed and produce bookkeeping on [`PlayerInventory`].
//!
//! Every function here either applies its whole change or none of it.
//! Counts are unsigned, so a seed balance can never go negative; removal
//! functions return `false` instead.

use std::collections::BTreeMap;

use tracing::warn;

use pumpkin_types::{CropType, PlayerInventory};

use crate::catalog::crop_spec;
use crate::config::FarmConfig;

/// The inventory a fresh farm starts with.
///
/// Only the default crop is unlocked and selected, with
/// `starting_seeds` seeds and no produce.
pub fn starting_inventory(config: &FarmConfig) -> PlayerInventory {
    let mut seeds = BTreeMap::new();
    seeds.insert(config.default_crop, config.starting_seeds);

    let mut unlocked_crops = BTreeMap::new();
    unlocked_crops.insert(config.default_crop, true);

    PlayerInventory {
        seeds,
        harvested_crops: BTreeMap::new(),
        unlocked_crops,
        selected_crop_type: config.default_crop,
    }
}

/// Remove one seed of `crop`. Returns `false` if none are held.
pub fn take_seed(inventory: &mut PlayerInventory, crop: CropType) -> bool {
    match inventory.seeds.get_mut(&crop) {
        Some(count) if *count > 0 => {
            *count = count.saturating_sub(1);
            true
        }
        _ => false,
    }
}

/// Add `amount` seeds of `crop`, saturating at `u32::MAX`.
pub fn add_seeds(inventory: &mut PlayerInventory, crop: CropType, amount: u32) {
    let entry = inventory.seeds.entry(crop).or_insert(0);
    *entry = entry.saturating_add(amount);
}

/// Credit one harvested `crop` plus its seed refund.
pub fn record_harvest(inventory: &mut PlayerInventory, crop: CropType) {
    let harvested = inventory.harvested_crops.entry(crop).or_insert(0);
    *harvested = harvested.saturating_add(1);
    add_seeds(inventory, crop, crop_spec(crop).seed_refund);
}

/// Remove one harvested `crop`. Returns `false` if none are held.
pub fn take_harvested(inventory: &mut PlayerInventory, crop: CropType) -> bool {
    match inventory.harvested_crops.get_mut(&crop) {
        Some(count) if *count > 0 => {
            *count = count.saturating_sub(1);
            true
        }
        _ => false,
    }
}

/// Mark `crop` unlocked. Returns `false` if it already was.
pub fn unlock(inventory: &mut PlayerInventory, crop: CropType) -> bool {
    if inventory.is_unlocked(crop) {
        return false;
    }
    inventory.unlocked_crops.insert(crop, true);
    true
}

/// Repair a restored inventory so it satisfies the farm's invariants.
///
/// The default crop is always unlocked, explicit `false` unlock flags are
/// dropped, and a locked selection falls back to the default crop.
pub fn normalize(inventory: &mut PlayerInventory, default_crop: CropType) {
    inventory.unlocked_crops.retain(|_, unlocked| *unlocked);
    inventory.unlocked_crops.insert(default_crop, true);

    if !inventory.is_unlocked(inventory.selected_crop_type) {
        warn!(
            selected = %inventory.selected_crop_type,
            fallback = %default_crop,
            "Selected crop type is locked; falling back to default"
        );
        inventory.selected_crop_type = default_crop;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> PlayerInventory {
        starting_inventory(&FarmConfig::default())
    }

    #[test]
    fn starting_inventory_has_default_crop_only() {
        let inv = fresh();
        assert_eq!(inv.seeds_of(CropType::Pumpkin), 10);
        assert_eq!(inv.harvested_of(CropType::Pumpkin), 0);
        assert!(inv.is_unlocked(CropType::Pumpkin));
        assert!(!inv.is_unlocked(CropType::Corn));
        assert_eq!(inv.selected_crop_type, CropType::Pumpkin);
    }

    #[test]
    fn take_seed_stops_at_zero() {
        let mut inv = fresh();
        inv.seeds.insert(CropType::Pumpkin, 1);
        assert!(take_seed(&mut inv, CropType::Pumpkin));
        assert!(!take_seed(&mut inv, CropType::Pumpkin));
        assert_eq!(inv.seeds_of(CropType::Pumpkin), 0);
        assert!(!take_seed(&mut inv, CropType::Wheat));
    }

    #[test]
    fn harvest_refund_depends_on_crop() {
        let mut inv = fresh();
        record_harvest(&mut inv, CropType::Pumpkin);
        assert_eq!(inv.harvested_of(CropType::Pumpkin), 1);
        assert_eq!(inv.seeds_of(CropType::Pumpkin), 12);

        record_harvest(&mut inv, CropType::Corn);
        assert_eq!(inv.harvested_of(CropType::Corn), 1);
        assert_eq!(inv.seeds_of(CropType::Corn), 1);
    }

    #[test]
    fn take_harvested_requires_stock() {
        let mut inv = fresh();
        assert!(!take_harvested(&mut inv, CropType::Pumpkin));
        record_harvest(&mut inv, CropType::Pumpkin);
        assert!(take_harvested(&mut inv, CropType::Pumpkin));
        assert_eq!(inv.harvested_of(CropType::Pumpkin), 0);
    }

    #[test]
    fn unlock_is_one_way() {
        let mut inv = fresh();
        assert!(unlock(&mut inv, CropType::Wheat));
        assert!(!unlock(&mut inv, CropType::Wheat));
        assert!(inv.is_unlocked(CropType::Wheat));
    }

    #[test]
    fn normalize_repairs_selection_and_default_unlock() {
        let mut inv = fresh();
        inv.unlocked_crops.clear();
        inv.unlocked_crops.insert(CropType::Corn, false);
        inv.selected_crop_type = CropType::Corn;

        normalize(&mut inv, CropType::Pumpkin);

        assert!(inv.is_unlocked(CropType::Pumpkin));
        assert!(!inv.unlocked_crops.contains_key(&CropType::Corn));
        assert_eq!(inv.selected_crop_type, CropType::Pumpkin);
    }
}
