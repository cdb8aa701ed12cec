//! Shared type definitions for the Pumpkin Patch farming game.
//!
//! This crate is the single source of truth for the data model shared by the
//! farm grid engine, the progression engine, and the session layer. Types
//! flow downstream to `TypeScript` via `ts-rs` for the browser UI.
//!
//! # Modules
//!
//! - [`enums`] -- Crop types, growth stages, and activity identifiers
//! - [`structs`] -- Crops, plots, inventory, and progression read models

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActivityCategory, ActivityId, CropType, GrowthStage};
pub use structs::{
    Crop, LevelProgress, PlayerInventory, Plot, StageCounts, XpAward, XpGain,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the browser UI.

    #[test]
    fn export_bindings() {
        // ts-rs writes the `.ts` files into `bindings/` relative to the
        // crate root when `export_all` runs.
        use ts_rs::TS;

        let _ = crate::enums::CropType::export_all();
        let _ = crate::enums::GrowthStage::export_all();
        let _ = crate::enums::ActivityCategory::export_all();
        let _ = crate::enums::ActivityId::export_all();

        let _ = crate::structs::Crop::export_all();
        let _ = crate::structs::Plot::export_all();
        let _ = crate::structs::PlayerInventory::export_all();
        let _ = crate::structs::StageCounts::export_all();
        let _ = crate::structs::XpGain::export_all();
        let _ = crate::structs::XpAward::export_all();
        let _ = crate::structs::LevelProgress::export_all();
    }
}
