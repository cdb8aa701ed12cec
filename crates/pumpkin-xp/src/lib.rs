//! Progression for the Pumpkin Patch farming game.
//!
//! This crate owns cumulative experience points and everything derived from
//! them. It has no knowledge of the farm: callers hand it a catalog
//! [`Activity`] and it credits the XP, recomputes the level, and records the
//! gain for transient UI display.
//!
//! # Modules
//!
//! - [`catalog`] -- Static table of XP-earning activities ([`Activity`])
//! - [`level`] -- The level formula: per-level requirements, cumulative
//!   thresholds, and level derivation from total XP
//! - [`progression`] -- [`ProgressionEngine`], the sole mutator of
//!   progression state, and its persisted [`ProgressionSnapshot`]

pub mod catalog;
pub mod level;
pub mod progression;

// Re-export primary types at crate root for convenience.
pub use catalog::{
    ACTIVITIES, Activity, FIRST_HARVEST, FIRST_PLANT, HARVEST_CROP, MASS_HARVEST, PLANT_SEED,
    REPAIR_EQUIPMENT, activity,
};
pub use level::{MAX_LEVEL, level_from_xp, total_xp_for_level, xp_for_level};
pub use progression::{ProgressionEngine, ProgressionSnapshot, RECENT_GAINS_CAPACITY};
