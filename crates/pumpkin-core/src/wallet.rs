//! The player's coin balance.
//!
//! [`CoinWallet`] is the session's [`CurrencyStore`]. It serializes as
//! `{ "count": n }`, the `coins` section of a save file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use pumpkin_farm::CurrencyStore;

/// A non-negative coin balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinWallet {
    /// Coins held.
    #[serde(default, deserialize_with = "lenient_count")]
    count: u64,
}

impl CoinWallet {
    /// Create a wallet holding `coins`.
    pub const fn new(coins: u64) -> Self {
        Self { count: coins }
    }

    /// Replace the balance (state restore and reset only).
    pub const fn set_coins(&mut self, coins: u64) {
        self.count = coins;
    }
}

impl CurrencyStore for CoinWallet {
    fn coins(&self) -> u64 {
        self.count
    }

    fn spend_coins(&mut self, amount: u64) -> bool {
        match self.count.checked_sub(amount) {
            Some(rest) => {
                self.count = rest;
                true
            }
            None => false,
        }
    }

    fn add_coins(&mut self, amount: u64) {
        self.count = self.count.saturating_add(amount);
    }
}

/// Accept integer or float counts; anything else restores as 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    if let Some(count) = raw.as_u64() {
        return Ok(count);
    }
    match raw.as_f64() {
        // Float-to-int `as` saturates, so negatives clamp to 0.
        Some(count) if count.is_finite() => Ok(count.floor() as u64),
        _ => {
            warn!(count = %raw, "Unreadable coin count in save; restoring as 0");
            Ok(0)
        }
    }
}
