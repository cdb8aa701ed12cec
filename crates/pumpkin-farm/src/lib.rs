//! Farm grid, crop growth, and inventory for the Pumpkin Patch farming game.
//!
//! This crate owns the N x N grid of plots, the crops growing on them, and
//! the player's seed and produce inventory. Planting and harvesting award XP
//! synchronously through a borrowed [`ProgressionEngine`]; the progression
//! crate has no dependency back on this one.
//!
//! # Modules
//!
//! - [`catalog`] -- Per-crop-type growth time, seed refund, and prices
//! - [`config`] -- Tunable farm parameters ([`FarmConfig`])
//! - [`currency`] -- The [`CurrencyStore`] seam consulted by shop operations
//! - [`error`] -- Error types for farm construction ([`FarmError`])
//! - [`grid`] -- [`FarmGrid`]: plant, harvest, growth tick, and queries
//! - [`inventory`] -- Seed and produce bookkeeping on [`PlayerInventory`]
//! - [`snapshot`] -- Persisted farm state and lenient restore
//!
//! [`ProgressionEngine`]: pumpkin_xp::ProgressionEngine
//! [`PlayerInventory`]: pumpkin_types::PlayerInventory

pub mod catalog;
pub mod config;
pub mod currency;
pub mod error;
pub mod grid;
pub mod inventory;
pub mod snapshot;

// Re-export primary types at crate root.
pub use catalog::{CropSpec, crop_spec};
pub use config::FarmConfig;
pub use currency::CurrencyStore;
pub use error::FarmError;
pub use grid::FarmGrid;
pub use snapshot::{FarmSnapshot, ProgressionFlags};
