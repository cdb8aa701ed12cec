//! The farm grid engine: planting, harvesting, and the growth tick.
//!
//! [`FarmGrid`] owns the plots, the crops on them, the inventory, and the
//! first-time/streak flags. It is the only code that mutates any of them.
//!
//! # Lifecycle
//!
//! ```text
//! plant ──> seed ──tick──> sprout ──tick──> growing ──tick──> mature ──harvest──> (empty)
//! ```
//!
//! A tick advances a crop when at least one stage duration (per crop type,
//! see [`crop_spec`]) has passed since its last transition. By default a
//! crop advances at most one stage per tick even after a long gap; setting
//! [`FarmConfig::catch_up_growth`] advances it by every whole duration that
//! has elapsed instead.
//!
//! Gameplay rejections return `false` and leave every piece of state
//! untouched. Time is always passed in by the caller, so the engine is
//! deterministic under test.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use pumpkin_types::{Crop, CropType, PlayerInventory, Plot, StageCounts};
use pumpkin_xp::{
    FIRST_HARVEST, FIRST_PLANT, HARVEST_CROP, MASS_HARVEST, PLANT_SEED, ProgressionEngine,
};

use crate::catalog::crop_spec;
use crate::config::FarmConfig;
use crate::currency::CurrencyStore;
use crate::error::FarmError;
use crate::inventory;
use crate::snapshot::{FarmSnapshot, ProgressionFlags};

/// The farm: an N x N grid of plots plus inventory and streak bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmGrid {
    /// Farm parameters fixed at construction.
    config: FarmConfig,
    /// Row-major plots, `grid_size * grid_size` long.
    plots: Vec<Plot>,
    /// Seeds, produce, and unlocks.
    inventory: PlayerInventory,
    /// First-time and streak flags.
    flags: ProgressionFlags,
}

impl FarmGrid {
    /// Create an empty farm with the starting inventory.
    ///
    /// # Errors
    ///
    /// Returns [`FarmError::InvalidConfig`] if the configuration fails
    /// [`FarmConfig::validate`].
    pub fn new(config: FarmConfig) -> Result<Self, FarmError> {
        config.validate()?;
        let mut farm = Self {
            plots: Vec::new(),
            inventory: inventory::starting_inventory(&config),
            flags: ProgressionFlags::default(),
            config,
        };
        farm.initialize();
        Ok(farm)
    }

    /// Reset to an empty grid, the starting inventory, and fresh flags.
    pub fn initialize(&mut self) {
        let size = self.config.grid_size;
        self.plots = vec![Plot::default(); size.saturating_mul(size)];
        self.inventory = inventory::starting_inventory(&self.config);
        self.flags = ProgressionFlags::default();
        debug!(grid_size = size, "Farm initialized");
    }

    // -----------------------------------------------------------------------
    // Gameplay
    // -----------------------------------------------------------------------

    /// Plant a seed at `(row, col)`.
    ///
    /// Uses `crop_type`, or the selected crop type when `None`. Fails without
    /// side effects if, in order: the coordinates are off the grid, the plot
    /// is occupied, the crop type is locked, or no seeds of it are held.
    ///
    /// On success awards [`FIRST_PLANT`] for the farm's first planting and
    /// [`PLANT_SEED`] otherwise.
    pub fn plant(
        &mut self,
        row: usize,
        col: usize,
        crop_type: Option<CropType>,
        now_ms: i64,
        xp: &mut ProgressionEngine,
    ) -> bool {
        let crop_type = crop_type.unwrap_or(self.inventory.selected_crop_type);

        let Some(index) = self.index(row, col) else {
            debug!(row, col, "Plant rejected: off grid");
            return false;
        };
        if self.plots.get(index).is_none_or(|plot| !plot.is_empty()) {
            debug!(row, col, "Plant rejected: plot occupied");
            return false;
        }
        if !self.inventory.is_unlocked(crop_type) {
            debug!(row, col, %crop_type, "Plant rejected: crop locked");
            return false;
        }
        if self.inventory.seeds_of(crop_type) == 0 {
            debug!(row, col, %crop_type, "Plant rejected: no seeds");
            return false;
        }

        let Some(plot) = self.plots.get_mut(index) else {
            return false;
        };
        if !inventory::take_seed(&mut self.inventory, crop_type) {
            return false;
        }
        plot.crop = Some(Crop::seed(crop_type, now_ms));

        if self.flags.is_first_plant {
            self.flags.is_first_plant = false;
            xp.award(&FIRST_PLANT, now_ms);
        } else {
            xp.award(&PLANT_SEED, now_ms);
        }

        debug!(
            row,
            col,
            %crop_type,
            seeds_left = self.inventory.seeds_of(crop_type),
            "Planted"
        );
        true
    }

    /// Harvest the mature crop at `(row, col)`.
    ///
    /// Fails without side effects if the coordinates are off the grid or the
    /// plot holds no mature crop. On success the plot is cleared, the
    /// harvested count and seed refund are credited, and XP is awarded:
    /// [`FIRST_HARVEST`] the first time, [`HARVEST_CROP`] otherwise, plus
    /// [`MASS_HARVEST`] whenever the quick-succession streak reaches the
    /// configured threshold (the streak then restarts from zero).
    pub fn harvest(
        &mut self,
        row: usize,
        col: usize,
        now_ms: i64,
        xp: &mut ProgressionEngine,
    ) -> bool {
        let Some(index) = self.index(row, col) else {
            debug!(row, col, "Harvest rejected: off grid");
            return false;
        };
        let Some(plot) = self.plots.get_mut(index) else {
            return false;
        };
        let Some(crop) = plot.crop.filter(|crop| crop.stage.is_mature()) else {
            debug!(row, col, "Harvest rejected: nothing mature");
            return false;
        };

        plot.crop = None;
        inventory::record_harvest(&mut self.inventory, crop.crop_type);

        // A clock that moved backwards breaks the streak.
        let since_last = now_ms.saturating_sub(self.flags.last_harvest_time);
        let in_window = (0..self.config.streak_window_ms).contains(&since_last);
        self.flags.consecutive_harvests = if in_window {
            self.flags.consecutive_harvests.saturating_add(1)
        } else {
            1
        };
        self.flags.last_harvest_time = now_ms;

        if self.flags.is_first_harvest {
            self.flags.is_first_harvest = false;
            xp.award(&FIRST_HARVEST, now_ms);
        } else {
            xp.award(&HARVEST_CROP, now_ms);
        }

        if self.flags.consecutive_harvests >= self.config.streak_threshold {
            info!(
                streak = self.flags.consecutive_harvests,
                "Mass harvest bonus"
            );
            xp.award(&MASS_HARVEST, now_ms);
            self.flags.consecutive_harvests = 0;
        }

        debug!(
            row,
            col,
            crop_type = %crop.crop_type,
            harvested = self.inventory.harvested_of(crop.crop_type),
            streak = self.flags.consecutive_harvests,
            "Harvested"
        );
        true
    }

    /// Advance every growing crop whose stage duration has elapsed.
    ///
    /// Mature crops are untouched. Returns the number of stage transitions
    /// made. Always safe to call; a clock that moved backwards simply
    /// advances nothing.
    pub fn update_growth(&mut self, now_ms: i64) -> u32 {
        let catch_up = self.config.catch_up_growth;
        let advanced = self
            .plots
            .iter_mut()
            .filter_map(|plot| plot.crop.as_mut())
            .fold(0_u32, |total, crop| {
                total.saturating_add(advance_crop(crop, now_ms, catch_up))
            });

        if advanced > 0 {
            debug!(advanced, "Growth tick");
        }
        advanced
    }

    // -----------------------------------------------------------------------
    // Shop and inventory
    // -----------------------------------------------------------------------

    /// Unlock a crop type. Returns `false` if it was already unlocked.
    ///
    /// This is the raw flag flip; level and coin requirements are the
    /// session's concern.
    pub fn unlock_crop(&mut self, crop: CropType) -> bool {
        let unlocked = inventory::unlock(&mut self.inventory, crop);
        if unlocked {
            info!(%crop, "Crop unlocked");
        }
        unlocked
    }

    /// Choose the default crop type for planting. Locked crops are refused.
    pub fn set_selected_crop_type(&mut self, crop: CropType) -> bool {
        if !self.inventory.is_unlocked(crop) {
            return false;
        }
        self.inventory.selected_crop_type = crop;
        true
    }

    /// Buy `quantity` seeds of an unlocked crop type.
    ///
    /// Fails without side effects for a locked crop, a zero quantity, or
    /// when the wallet refuses the `seed_price * quantity` debit.
    pub fn purchase_seeds(
        &mut self,
        crop: CropType,
        quantity: u32,
        wallet: &mut dyn CurrencyStore,
    ) -> bool {
        if quantity == 0 || !self.inventory.is_unlocked(crop) {
            return false;
        }
        let Some(cost) = crop_spec(crop).seed_price.checked_mul(u64::from(quantity)) else {
            return false;
        };
        if !wallet.spend_coins(cost) {
            debug!(%crop, quantity, cost, coins = wallet.coins(), "Seed purchase refused");
            return false;
        }
        inventory::add_seeds(&mut self.inventory, crop, quantity);
        debug!(%crop, quantity, cost, "Seeds purchased");
        true
    }

    /// Sell one harvested crop for its catalog price.
    pub fn sell_crop(&mut self, crop: CropType, wallet: &mut dyn CurrencyStore) -> bool {
        if !inventory::take_harvested(&mut self.inventory, crop) {
            return false;
        }
        let price = crop_spec(crop).sell_price;
        wallet.add_coins(price);
        debug!(%crop, price, "Crop sold");
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Width and height of the grid.
    pub const fn size(&self) -> usize {
        self.config.grid_size
    }

    /// The configuration the farm was built with.
    pub const fn config(&self) -> &FarmConfig {
        &self.config
    }

    /// The plot at `(row, col)`, if on the grid.
    pub fn plot(&self, row: usize, col: usize) -> Option<&Plot> {
        self.index(row, col).and_then(|index| self.plots.get(index))
    }

    /// The grid as rows of plots.
    pub fn rows(&self) -> impl Iterator<Item = &[Plot]> {
        self.plots.chunks(self.config.grid_size.max(1))
    }

    /// Current inventory.
    pub const fn inventory(&self) -> &PlayerInventory {
        &self.inventory
    }

    /// Current first-time and streak flags.
    pub const fn flags(&self) -> &ProgressionFlags {
        &self.flags
    }

    /// Count crops per stage for every crop type, including absent ones.
    pub fn get_total_crops_by_stage(&self) -> BTreeMap<CropType, StageCounts> {
        let mut counts: BTreeMap<CropType, StageCounts> = CropType::ALL
            .into_iter()
            .map(|crop| (crop, StageCounts::default()))
            .collect();

        for crop in self.plots.iter().filter_map(|plot| plot.crop.as_ref()) {
            counts.entry(crop.crop_type).or_default().increment(crop.stage);
        }
        counts
    }

    /// Count crops per stage across all crop types.
    pub fn stage_totals(&self) -> StageCounts {
        let mut totals = StageCounts::default();
        for crop in self.plots.iter().filter_map(|plot| plot.crop.as_ref()) {
            totals.increment(crop.stage);
        }
        totals
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Capture everything needed to rebuild this farm.
    pub fn snapshot(&self) -> FarmSnapshot {
        FarmSnapshot {
            farm_grid: self.rows().map(<[Plot]>::to_vec).collect(),
            inventory: Some(self.inventory.clone()),
            flags: self.flags,
        }
    }

    /// Rebuild the farm from a snapshot.
    ///
    /// A missing inventory falls back to the starting inventory.
    pub fn restore(&mut self, snapshot: FarmSnapshot) {
        self.set_farm_grid(snapshot.farm_grid);
        match snapshot.inventory {
            Some(restored) => self.set_inventory(restored),
            None => self.inventory = inventory::starting_inventory(&self.config),
        }
        self.set_xp_state(snapshot.flags);
    }

    /// Replace the plots from saved rows.
    ///
    /// The grid keeps its configured size: cells outside it are discarded and
    /// missing cells are left empty.
    pub fn set_farm_grid(&mut self, rows: Vec<Vec<Plot>>) {
        let size = self.config.grid_size;
        let shape_matches = rows.len() == size && rows.iter().all(|row| row.len() == size);
        if !shape_matches {
            warn!(
                expected = size,
                rows = rows.len(),
                "Saved grid size differs from configured size; fitting to grid"
            );
        }

        self.plots = vec![Plot::default(); size.saturating_mul(size)];
        for (row_index, row) in rows.into_iter().take(size).enumerate() {
            for (col_index, plot) in row.into_iter().take(size).enumerate() {
                if let Some(slot) = self
                    .index(row_index, col_index)
                    .and_then(|index| self.plots.get_mut(index))
                {
                    *slot = plot;
                }
            }
        }
    }

    /// Replace the inventory, repairing unlock and selection invariants.
    pub fn set_inventory(&mut self, mut restored: PlayerInventory) {
        inventory::normalize(&mut restored, self.config.default_crop);
        self.inventory = restored;
    }

    /// Replace the first-time and streak flags.
    pub const fn set_xp_state(&mut self, flags: ProgressionFlags) {
        self.flags = flags;
    }

    /// Row-major index of `(row, col)`, if on the grid.
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        let size = self.config.grid_size;
        if row >= size || col >= size {
            return None;
        }
        row.checked_mul(size)?.checked_add(col)
    }
}

/// Advance one crop according to the elapsed time. Returns stages advanced.
fn advance_crop(crop: &mut Crop, now_ms: i64, catch_up: bool) -> u32 {
    let step = crop_spec(crop.crop_type).growth_time_per_stage_ms;
    let mut advanced: u32 = 0;

    while let Some(next) = crop.stage.next() {
        if now_ms.saturating_sub(crop.last_growth_time) < step {
            break;
        }
        crop.stage = next;
        advanced = advanced.saturating_add(1);

        if catch_up {
            crop.last_growth_time = crop.last_growth_time.saturating_add(step);
        } else {
            crop.last_growth_time = now_ms;
            break;
        }
    }

    advanced
}
