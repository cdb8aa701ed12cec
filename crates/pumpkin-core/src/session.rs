//! A single player's game: farm, progression, coins, and clock in one place.
//!
//! [`GameSession`] is the explicit context object that every operation goes
//! through. It stamps each call with the current time from its
//! [`GameClock`] and lends the progression engine and wallet to the farm
//! for the duration of the call. There is no shared global state: two
//! sessions in the same process are fully independent.

use tracing::{info, warn};

use pumpkin_farm::{CurrencyStore, FarmError, FarmGrid, crop_spec};
use pumpkin_types::{CropType, XpAward};
use pumpkin_xp::{Activity, ProgressionEngine, REPAIR_EQUIPMENT};

use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::save::{SAVE_VERSION, SaveData};
use crate::wallet::CoinWallet;

/// One player's game state.
#[derive(Debug)]
pub struct GameSession {
    /// Plots, crops, and inventory.
    farm: FarmGrid,
    /// XP and level.
    progression: ProgressionEngine,
    /// Coin balance.
    wallet: CoinWallet,
    /// Source of "now" for every operation.
    clock: Box<dyn GameClock>,
    /// Balance restored by [`reset`](Self::reset).
    starting_coins: u64,
}

impl GameSession {
    /// Start a fresh game.
    ///
    /// # Errors
    ///
    /// Returns [`FarmError::InvalidConfig`] if the farm section is unusable.
    pub fn new(config: &GameConfig, clock: Box<dyn GameClock>) -> Result<Self, FarmError> {
        let starting_coins = config.economy.starting_coins;
        Ok(Self {
            farm: FarmGrid::new(config.farm.clone())?,
            progression: ProgressionEngine::new(),
            wallet: CoinWallet::new(starting_coins),
            clock,
            starting_coins,
        })
    }

    /// Current time from the session clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // -----------------------------------------------------------------------
    // Farming
    // -----------------------------------------------------------------------

    /// Plant at `(row, col)`; `None` uses the selected crop type.
    pub fn plant(&mut self, row: usize, col: usize, crop: Option<CropType>) -> bool {
        let now = self.now_ms();
        self.farm.plant(row, col, crop, now, &mut self.progression)
    }

    /// Harvest the mature crop at `(row, col)`.
    pub fn harvest(&mut self, row: usize, col: usize) -> bool {
        let now = self.now_ms();
        self.farm.harvest(row, col, now, &mut self.progression)
    }

    /// Run one growth tick. Returns the number of stage transitions.
    pub fn update_growth(&mut self) -> u32 {
        let now = self.now_ms();
        self.farm.update_growth(now)
    }

    /// Choose the default crop type for planting.
    pub fn set_selected_crop_type(&mut self, crop: CropType) -> bool {
        self.farm.set_selected_crop_type(crop)
    }

    // -----------------------------------------------------------------------
    // Shop
    // -----------------------------------------------------------------------

    /// Buy seeds of an unlocked crop type with coins.
    pub fn purchase_seeds(&mut self, crop: CropType, quantity: u32) -> bool {
        self.farm.purchase_seeds(crop, quantity, &mut self.wallet)
    }

    /// Sell one harvested crop for coins.
    pub fn sell_crop(&mut self, crop: CropType) -> bool {
        self.farm.sell_crop(crop, &mut self.wallet)
    }

    /// Buy the unlock for a crop type.
    ///
    /// Requires the crop to still be locked, the player to be at least its
    /// unlock level, and enough coins for its unlock cost. Nothing changes
    /// unless all three hold.
    pub fn buy_crop_unlock(&mut self, crop: CropType) -> bool {
        if self.farm.inventory().is_unlocked(crop) {
            return false;
        }
        let spec = crop_spec(crop);
        let level = self.progression.level();
        if level < spec.unlock_level {
            info!(
                %crop,
                level,
                required = spec.unlock_level,
                "Unlock refused: level too low"
            );
            return false;
        }
        if !self.wallet.spend_coins(spec.unlock_cost) {
            info!(
                %crop,
                coins = self.wallet.coins(),
                cost = spec.unlock_cost,
                "Unlock refused: not enough coins"
            );
            return false;
        }
        self.farm.unlock_crop(crop)
    }

    // -----------------------------------------------------------------------
    // Progression
    // -----------------------------------------------------------------------

    /// Award XP for an activity, scaled by `bonus_multiplier`.
    pub fn add_xp(&mut self, activity: &Activity, bonus_multiplier: f64) -> XpAward {
        let now = self.now_ms();
        self.progression.add_xp(activity, bonus_multiplier, now)
    }

    /// Record a completed equipment repair.
    pub fn repair_equipment(&mut self) -> XpAward {
        let now = self.now_ms();
        self.progression.award(&REPAIR_EQUIPMENT, now)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The farm.
    pub const fn farm(&self) -> &FarmGrid {
        &self.farm
    }

    /// The progression engine.
    pub const fn progression(&self) -> &ProgressionEngine {
        &self.progression
    }

    /// Mutable progression access, e.g. to clear the recent gain log.
    pub const fn progression_mut(&mut self) -> &mut ProgressionEngine {
        &mut self.progression
    }

    /// The coin wallet.
    pub const fn wallet(&self) -> &CoinWallet {
        &self.wallet
    }

    /// Current coin balance.
    pub fn coins(&self) -> u64 {
        self.wallet.coins()
    }

    // -----------------------------------------------------------------------
    // Lifecycle and persistence
    // -----------------------------------------------------------------------

    /// Start over: empty farm, starting inventory, no XP, starting coins.
    pub fn reset(&mut self) {
        self.farm.initialize();
        self.progression = ProgressionEngine::new();
        self.wallet.set_coins(self.starting_coins);
        info!("Game reset");
    }

    /// Build a save of the current state.
    pub fn save_data(&self) -> SaveData {
        SaveData {
            version: SAVE_VERSION.to_owned(),
            timestamp: self.now_ms(),
            farm: self.farm.snapshot(),
            progression: self.progression.snapshot(),
            coins: self.wallet,
        }
    }

    /// Replace the current state with a save.
    ///
    /// Saves from other format versions are loaded as-is after a warning;
    /// the section decoders already handle older shapes.
    pub fn restore(&mut self, save: SaveData) {
        if !save.is_current_version() {
            warn!(
                found = save.version,
                expected = SAVE_VERSION,
                "Save data version mismatch"
            );
        }
        self.farm.restore(save.farm);
        self.progression.restore(&save.progression);
        self.wallet = save.coins;
        info!(
            level = self.progression.level(),
            coins = self.wallet.coins(),
            saved_at = save.timestamp,
            "Game state restored"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use pumpkin_types::GrowthStage;

    use super::*;
    use crate::clock::ManualClock;

    const T0: i64 = 1_700_000_000_000;

    fn session_with(coins: u64) -> (GameSession, ManualClock) {
        let clock = ManualClock::new(T0);
        let mut config = GameConfig::default();
        config.economy.starting_coins = coins;
        let session = GameSession::new(&config, Box::new(clock.clone())).unwrap();
        (session, clock)
    }

    #[test]
    fn operations_use_session_clock() {
        let (mut session, clock) = session_with(0);
        assert!(session.plant(0, 0, None));
        let crop = session.farm().plot(0, 0).and_then(|p| p.crop).unwrap();
        assert_eq!(crop.planted_time, T0);

        clock.advance(5_000);
        assert_eq!(session.update_growth(), 1);
        let crop = session.farm().plot(0, 0).and_then(|p| p.crop).unwrap();
        assert_eq!(crop.stage, GrowthStage::Sprout);
        assert_eq!(crop.last_growth_time, T0 + 5_000);
    }

    #[test]
    fn buy_crop_unlock_checks_level_then_coins() {
        let (mut session, _) = session_with(500);

        // Level 1 cannot unlock wheat (level 2).
        assert!(!session.buy_crop_unlock(CropType::Wheat));
        assert_eq!(session.coins(), 500);

        session.progression_mut().set_level(2);
        assert!(session.buy_crop_unlock(CropType::Wheat));
        assert_eq!(session.coins(), 450);
        assert!(session.farm().inventory().is_unlocked(CropType::Wheat));

        // Already unlocked: no second charge.
        assert!(!session.buy_crop_unlock(CropType::Wheat));
        assert_eq!(session.coins(), 450);
    }

    #[test]
    fn buy_crop_unlock_needs_coins() {
        let (mut session, _) = session_with(100);
        session.progression_mut().set_level(3);
        assert!(!session.buy_crop_unlock(CropType::Corn));
        assert_eq!(session.coins(), 100);
        assert!(!session.farm().inventory().is_unlocked(CropType::Corn));
    }

    #[test]
    fn repair_awards_xp() {
        let (mut session, _) = session_with(0);
        let award = session.repair_equipment();
        assert_eq!(award.gained, 25);
        assert_eq!(session.progression().total_xp_earned(), 25);
    }

    #[test]
    fn shop_round_trip() {
        let (mut session, _) = session_with(10);
        assert!(session.purchase_seeds(CropType::Pumpkin, 2));
        assert_eq!(session.coins(), 0);
        assert_eq!(session.farm().inventory().seeds_of(CropType::Pumpkin), 12);
        assert!(!session.sell_crop(CropType::Pumpkin));
    }

    #[test]
    fn reset_restores_starting_state() {
        let (mut session, _) = session_with(7);
        assert!(session.plant(1, 1, None));
        session.repair_equipment();
        assert!(session.purchase_seeds(CropType::Pumpkin, 1));

        session.reset();
        assert_eq!(session.coins(), 7);
        assert_eq!(session.progression().total_xp_earned(), 0);
        assert_eq!(session.farm().stage_totals().total(), 0);
        assert_eq!(session.farm().inventory().seeds_of(CropType::Pumpkin), 10);
    }

    #[test]
    fn save_and_restore_into_new_session() {
        let (mut session, clock) = session_with(30);
        assert!(session.plant(0, 0, None));
        clock.advance(5_000);
        session.update_growth();
        session.repair_equipment();

        let save = session.save_data();
        assert_eq!(save.version, SAVE_VERSION);
        assert_eq!(save.timestamp, T0 + 5_000);

        let (mut restored, _) = session_with(0);
        restored.restore(save);

        assert_eq!(restored.farm(), session.farm());
        assert_eq!(
            restored.progression().total_xp_earned(),
            session.progression().total_xp_earned()
        );
        assert_eq!(restored.coins(), 30);
        // The gain log is transient.
        assert_eq!(restored.progression().recent_gains().len(), 0);
    }

    #[test]
    fn old_version_still_restores() {
        let (mut session, _) = session_with(0);
        let mut save = session.save_data();
        save.version = "1.0.0".to_owned();
        save.coins = CoinWallet::new(99);
        session.restore(save);
        assert_eq!(session.coins(), 99);
    }
}
