//! Persisted farm state and lenient restore.
//!
//! A [`FarmSnapshot`] carries everything needed to rebuild a farm: the plot
//! grid, the inventory, and the streak/first-time flags. Serialization is
//! strict; deserialization is forgiving. A corrupted save should never stop
//! the game from loading, so unreadable pieces are replaced with safe
//! defaults and a warning is logged:
//!
//! - unknown or out-of-range growth stages restore as `seed`
//! - crops with an unknown crop type are dropped from their plot
//! - crops without a `cropType` (older saves) restore as pumpkins
//! - bad inventory entries are dropped one by one; an inventory with no
//!   readable shape at all restores as the starting inventory
//! - bad streak or first-time flags restore as their fresh-farm values
//!
//! Older saves stored the crop under a `pumpkin` key and the inventory as
//! `{ seeds, harvestedPumpkins }`; both shapes are accepted.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use pumpkin_types::{Crop, CropType, GrowthStage, PlayerInventory, Plot};

/// Streak and first-time bookkeeping that drives achievement XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionFlags {
    /// No seed has been planted yet on this farm.
    #[serde(default = "default_true", deserialize_with = "lenient_first_flag")]
    pub is_first_plant: bool,
    /// No crop has been harvested yet on this farm.
    #[serde(default = "default_true", deserialize_with = "lenient_first_flag")]
    pub is_first_harvest: bool,
    /// Harvests in the current quick-succession streak.
    #[serde(default, deserialize_with = "lenient_streak")]
    pub consecutive_harvests: u32,
    /// Milliseconds since the Unix epoch of the most recent harvest.
    #[serde(default, deserialize_with = "lenient_harvest_time")]
    pub last_harvest_time: i64,
}

impl Default for ProgressionFlags {
    fn default() -> Self {
        Self {
            is_first_plant: true,
            is_first_harvest: true,
            consecutive_harvests: 0,
            last_harvest_time: 0,
        }
    }
}

/// Everything the farm persists between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmSnapshot {
    /// Plot grid, row-major.
    #[serde(default, deserialize_with = "lenient_grid")]
    pub farm_grid: Vec<Vec<Plot>>,
    /// Inventory, or `None` if the saved one could not be read.
    #[serde(default, deserialize_with = "lenient_inventory")]
    pub inventory: Option<PlayerInventory>,
    /// Streak and first-time flags.
    #[serde(flatten)]
    pub flags: ProgressionFlags,
}

const fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Lenient flag decoding
// ---------------------------------------------------------------------------

fn lenient_first_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_bool().unwrap_or_else(|| {
        warn!(flag = %raw, "Unreadable first-time flag in save; restoring as true");
        true
    }))
}

fn lenient_streak<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(decode_count(&raw).unwrap_or_else(|| {
        warn!(streak = %raw, "Unreadable harvest streak in save; restoring as 0");
        0
    }))
}

fn lenient_harvest_time<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(decode_time(Some(&raw)).unwrap_or_else(|| {
        warn!(time = %raw, "Unreadable last harvest time in save; restoring as 0");
        0
    }))
}

/// A non-negative count that fits in `u32`.
fn decode_count(raw: &Value) -> Option<u32> {
    raw.as_u64().and_then(|n| u32::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// Lenient grid decoding
// ---------------------------------------------------------------------------

fn lenient_grid<'de, D>(deserializer: D) -> Result<Vec<Vec<Plot>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(decode_grid(&raw))
}

/// Decode a grid from arbitrary JSON, substituting defaults for bad cells.
pub fn decode_grid(raw: &Value) -> Vec<Vec<Plot>> {
    let Some(rows) = raw.as_array() else {
        if !raw.is_null() {
            warn!("Saved farm grid is not an array; starting with an empty grid");
        }
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .map(|(row_index, row)| {
            row.as_array().map_or_else(
                || {
                    warn!(row = row_index, "Saved grid row is not an array; clearing row");
                    Vec::new()
                },
                |cells| cells.iter().map(decode_plot).collect(),
            )
        })
        .collect()
}

fn decode_plot(cell: &Value) -> Plot {
    let crop = cell
        .get("crop")
        .or_else(|| cell.get("pumpkin"))
        .filter(|value| !value.is_null())
        .and_then(decode_crop);
    Plot { crop }
}

fn decode_crop(raw: &Value) -> Option<Crop> {
    let crop_type = match raw.get("cropType") {
        None | Some(Value::Null) => CropType::Pumpkin,
        Some(Value::String(name)) => {
            let Some(crop_type) = CropType::from_name(name) else {
                warn!(crop_type = name.as_str(), "Unknown crop type in save; dropping crop");
                return None;
            };
            crop_type
        }
        Some(other) => {
            warn!(crop_type = %other, "Malformed crop type in save; dropping crop");
            return None;
        }
    };

    let planted_time = decode_time(raw.get("plantedTime")).unwrap_or(0);
    let last_growth_time = decode_time(raw.get("lastGrowthTime")).unwrap_or(planted_time);

    Some(Crop {
        crop_type,
        stage: decode_stage(raw.get("stage")),
        planted_time,
        last_growth_time,
    })
}

/// Decode a stage by name or index, falling back to [`GrowthStage::Seed`].
pub fn decode_stage(raw: Option<&Value>) -> GrowthStage {
    let decoded = match raw {
        Some(Value::String(name)) => GrowthStage::from_name(name),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .and_then(GrowthStage::from_index),
        _ => None,
    };

    decoded.unwrap_or_else(|| {
        warn!(stage = ?raw, "Unreadable growth stage in save; restoring as seed");
        GrowthStage::Seed
    })
}

#[allow(clippy::cast_possible_truncation)]
fn decode_time(raw: Option<&Value>) -> Option<i64> {
    let raw = raw?;
    if let Some(ms) = raw.as_i64() {
        return Some(ms);
    }
    // Float-to-int `as` saturates, which is the clamp we want here.
    raw.as_f64()
        .filter(|ms| ms.is_finite())
        .map(|ms| ms.floor() as i64)
}

// ---------------------------------------------------------------------------
// Lenient inventory decoding
// ---------------------------------------------------------------------------

fn lenient_inventory<'de, D>(deserializer: D) -> Result<Option<PlayerInventory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(decode_inventory(&raw))
}

/// Decode an inventory in the current or legacy shape.
///
/// Entries are read one at a time: an unknown crop key or an unreadable
/// count drops that entry only. Returns `None` when the value has none of
/// the inventory sections.
pub fn decode_inventory(raw: &Value) -> Option<PlayerInventory> {
    if raw.is_null() {
        return None;
    }

    if let Some(legacy) = decode_legacy_inventory(raw) {
        return Some(legacy);
    }

    let sections = ["seeds", "harvestedCrops", "unlockedCrops"];
    let Some(fields) = raw
        .as_object()
        .filter(|fields| sections.iter().any(|key| fields.contains_key(*key)))
    else {
        warn!(inventory = %raw, "Unreadable inventory in save; using starting inventory");
        return None;
    };

    let selected_crop_type = fields
        .get("selectedCropType")
        .and_then(Value::as_str)
        .and_then(CropType::from_name)
        .unwrap_or_else(|| {
            warn!(
                selected = ?fields.get("selectedCropType"),
                "Unreadable selected crop type in save; using pumpkin"
            );
            CropType::Pumpkin
        });

    Some(PlayerInventory {
        seeds: decode_crop_map(fields.get("seeds"), "seeds", decode_count),
        harvested_crops: decode_crop_map(
            fields.get("harvestedCrops"),
            "harvestedCrops",
            decode_count,
        ),
        unlocked_crops: decode_crop_map(
            fields.get("unlockedCrops"),
            "unlockedCrops",
            Value::as_bool,
        ),
        selected_crop_type,
    })
}

/// Decode a `{ cropName: value }` map, skipping entries that do not parse.
fn decode_crop_map<T>(
    raw: Option<&Value>,
    section: &str,
    decode: impl Fn(&Value) -> Option<T>,
) -> BTreeMap<CropType, T> {
    let Some(raw) = raw.filter(|value| !value.is_null()) else {
        return BTreeMap::new();
    };
    let Some(entries) = raw.as_object() else {
        warn!(section, value = %raw, "Inventory section is not an object; clearing it");
        return BTreeMap::new();
    };

    entries
        .iter()
        .filter_map(|(name, value)| {
            let Some(crop) = CropType::from_name(name) else {
                warn!(
                    section,
                    crop_type = name.as_str(),
                    "Unknown crop type in inventory; dropping entry"
                );
                return None;
            };
            let Some(decoded) = decode(value) else {
                warn!(section, %crop, %value, "Unreadable inventory entry; dropping it");
                return None;
            };
            Some((crop, decoded))
        })
        .collect()
}

/// The pumpkin-only inventory shape: `{ seeds: n, harvestedPumpkins: n }`.
fn decode_legacy_inventory(raw: &Value) -> Option<PlayerInventory> {
    let seeds = raw.get("seeds")?.as_u64()?;
    let harvested = raw
        .get("harvestedPumpkins")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    let clamp = |n: u64| u32::try_from(n).unwrap_or(u32::MAX);

    Some(PlayerInventory {
        seeds: BTreeMap::from([(CropType::Pumpkin, clamp(seeds))]),
        harvested_crops: BTreeMap::from([(CropType::Pumpkin, clamp(harvested))]),
        unlocked_crops: BTreeMap::from([(CropType::Pumpkin, true)]),
        selected_crop_type: CropType::Pumpkin,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> FarmSnapshot {
        serde_json::from_value(value).unwrap_or_else(|_| FarmSnapshot {
            farm_grid: Vec::new(),
            inventory: None,
            flags: ProgressionFlags {
                is_first_plant: false,
                is_first_harvest: false,
                consecutive_harvests: 999,
                last_harvest_time: -1,
            },
        })
    }

    #[test]
    fn flags_default_to_fresh_farm() {
        let snapshot = parse(json!({}));
        assert_eq!(snapshot.flags, ProgressionFlags::default());
        assert!(snapshot.farm_grid.is_empty());
        assert!(snapshot.inventory.is_none());
    }

    #[test]
    fn flags_use_camel_case_keys() {
        let snapshot = parse(json!({
            "isFirstPlant": false,
            "isFirstHarvest": true,
            "consecutiveHarvests": 3,
            "lastHarvestTime": 12_345
        }));
        assert!(!snapshot.flags.is_first_plant);
        assert!(snapshot.flags.is_first_harvest);
        assert_eq!(snapshot.flags.consecutive_harvests, 3);
        assert_eq!(snapshot.flags.last_harvest_time, 12_345);
    }

    #[test]
    fn bad_stage_restores_as_seed() {
        let snapshot = parse(json!({
            "farmGrid": [[
                { "crop": { "cropType": "corn", "stage": "rotten", "plantedTime": 5, "lastGrowthTime": 6 } },
                { "crop": { "cropType": "corn", "stage": 17, "plantedTime": 5, "lastGrowthTime": 6 } },
                { "crop": { "cropType": "corn", "stage": 2, "plantedTime": 5, "lastGrowthTime": 6 } }
            ]]
        }));
        let row = snapshot.farm_grid.first().cloned().unwrap_or_default();
        let stages: Vec<Option<GrowthStage>> =
            row.iter().map(|plot| plot.crop.map(|c| c.stage)).collect();
        assert_eq!(
            stages,
            vec![
                Some(GrowthStage::Seed),
                Some(GrowthStage::Seed),
                Some(GrowthStage::Growing)
            ]
        );
    }

    #[test]
    fn unknown_crop_type_is_dropped() {
        let snapshot = parse(json!({
            "farmGrid": [[{ "crop": { "cropType": "turnip", "stage": "mature" } }]]
        }));
        let plot = snapshot
            .farm_grid
            .first()
            .and_then(|row| row.first())
            .copied()
            .unwrap_or_default();
        assert!(plot.is_empty());
    }

    #[test]
    fn legacy_pumpkin_saves_load() {
        let snapshot = parse(json!({
            "farmGrid": [[
                { "pumpkin": { "stage": "sprout", "plantedTime": 100, "lastGrowthTime": 200 } },
                { "pumpkin": null }
            ]],
            "inventory": { "seeds": 7, "harvestedPumpkins": 3 }
        }));

        let row = snapshot.farm_grid.first().cloned().unwrap_or_default();
        assert_eq!(
            row.first().and_then(|p| p.crop),
            Some(Crop {
                crop_type: CropType::Pumpkin,
                stage: GrowthStage::Sprout,
                planted_time: 100,
                last_growth_time: 200,
            })
        );
        assert!(row.get(1).is_some_and(Plot::is_empty));

        let inventory = snapshot.inventory.unwrap_or_else(|| PlayerInventory {
            seeds: BTreeMap::new(),
            harvested_crops: BTreeMap::new(),
            unlocked_crops: BTreeMap::new(),
            selected_crop_type: CropType::Corn,
        });
        assert_eq!(inventory.seeds_of(CropType::Pumpkin), 7);
        assert_eq!(inventory.harvested_of(CropType::Pumpkin), 3);
        assert!(inventory.is_unlocked(CropType::Pumpkin));
    }

    #[test]
    fn garbage_inventory_becomes_none() {
        let snapshot = parse(json!({ "inventory": "lots of seeds" }));
        assert!(snapshot.inventory.is_none());
    }

    #[test]
    fn bad_inventory_entries_are_dropped_individually() {
        let snapshot = parse(json!({
            "inventory": {
                "seeds": { "pumpkin": 40, "corn": -1, "turnip": 3 },
                "harvestedCrops": { "pumpkin": 9, "wheat": "nine" },
                "unlockedCrops": { "pumpkin": true, "corn": "yes" },
                "selectedCropType": 4
            }
        }));
        let inventory = snapshot.inventory.unwrap_or_else(|| PlayerInventory {
            seeds: BTreeMap::new(),
            harvested_crops: BTreeMap::new(),
            unlocked_crops: BTreeMap::new(),
            selected_crop_type: CropType::Corn,
        });

        assert_eq!(inventory.seeds, BTreeMap::from([(CropType::Pumpkin, 40)]));
        assert_eq!(
            inventory.harvested_crops,
            BTreeMap::from([(CropType::Pumpkin, 9)])
        );
        assert_eq!(
            inventory.unlocked_crops,
            BTreeMap::from([(CropType::Pumpkin, true)])
        );
        assert_eq!(inventory.selected_crop_type, CropType::Pumpkin);
    }

    #[test]
    fn inventory_without_sections_becomes_none() {
        let snapshot = parse(json!({ "inventory": { "coins": 4 } }));
        assert!(snapshot.inventory.is_none());
    }

    #[test]
    fn bad_flags_fall_back_field_by_field() {
        let snapshot = parse(json!({
            "isFirstPlant": false,
            "isFirstHarvest": null,
            "consecutiveHarvests": -1,
            "lastHarvestTime": "yesterday"
        }));
        assert_eq!(
            snapshot.flags,
            ProgressionFlags {
                is_first_plant: false,
                ..ProgressionFlags::default()
            }
        );

        let snapshot = parse(json!({ "consecutiveHarvests": 2.5, "lastHarvestTime": 99.9 }));
        assert_eq!(snapshot.flags.consecutive_harvests, 0);
        assert_eq!(snapshot.flags.last_harvest_time, 99);
    }

    #[test]
    fn float_timestamps_floor() {
        let snapshot = parse(json!({
            "farmGrid": [[{ "crop": { "cropType": "wheat", "stage": "seed", "plantedTime": 1500.7 } }]]
        }));
        let crop = snapshot
            .farm_grid
            .first()
            .and_then(|row| row.first())
            .and_then(|plot| plot.crop);
        assert_eq!(crop.map(|c| c.planted_time), Some(1500));
        assert_eq!(crop.map(|c| c.last_growth_time), Some(1500));
    }
}
