//! The progression engine: cumulative XP, derived level, and recent gains.
//!
//! [`ProgressionEngine`] stores exactly two things: the cumulative XP total
//! and a bounded log of recent gains. Level and in-level progress are
//! recomputed from the total on every read, so they cannot drift from it.
//!
//! [`add_xp`](ProgressionEngine::add_xp) is the only gameplay mutator. The
//! `set_*` methods exist for restoring persisted state and never append to
//! the gain log or report level-ups.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use pumpkin_types::{LevelProgress, XpAward, XpGain};

use crate::catalog::Activity;
use crate::level::{self, MAX_LEVEL};

/// Number of recent gains retained for UI notifications.
pub const RECENT_GAINS_CAPACITY: usize = 5;

/// Persisted progression state.
///
/// Only the total is stored; level and in-level XP are re-derived on load.
/// The total is kept as a JSON number so snapshots written by the browser
/// client load unchanged. A total that is not a finite number (including the
/// `null` that a NaN serializes to) loads as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    /// Cumulative XP ever earned.
    #[serde(default, rename = "totalXPEarned", deserialize_with = "lenient_total")]
    pub total_xp_earned: f64,
}

fn lenient_total<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    match raw.as_f64() {
        Some(total) if total.is_finite() => Ok(total.max(0.0)),
        _ => {
            warn!(total = %raw, "Unreadable XP total in save; restoring as 0");
            Ok(0.0)
        }
    }
}

/// Owner of all progression state for a single game session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionEngine {
    /// Cumulative XP ever earned. Never decreases through gameplay.
    total_xp_earned: u64,
    /// Most recent gains, oldest first.
    recent_gains: VecDeque<XpGain>,
}

impl ProgressionEngine {
    /// Create an engine at level 1 with no XP.
    pub const fn new() -> Self {
        Self {
            total_xp_earned: 0,
            recent_gains: VecDeque::new(),
        }
    }

    /// Award XP for an activity, scaled by `bonus_multiplier`.
    ///
    /// `gained = floor(base_xp * bonus_multiplier)`. Non-finite or negative
    /// multipliers award nothing. The gain is appended to the recent log
    /// (evicting the oldest entry beyond [`RECENT_GAINS_CAPACITY`]) even
    /// when it is zero, so the UI sees every attempt.
    pub fn add_xp(&mut self, activity: &Activity, bonus_multiplier: f64, now_ms: i64) -> XpAward {
        let previous_level = self.level();
        let gained = scaled_xp(activity.base_xp, bonus_multiplier);

        self.total_xp_earned = self.total_xp_earned.saturating_add(gained);
        let new_level = self.level();

        if self.recent_gains.len() >= RECENT_GAINS_CAPACITY {
            self.recent_gains.pop_front();
        }
        self.recent_gains.push_back(XpGain {
            activity: activity.id,
            amount: gained,
            timestamp: now_ms,
        });

        let leveled_up = new_level > previous_level;

        debug!(
            activity = activity.name,
            gained,
            bonus_multiplier,
            total = self.total_xp_earned,
            "XP gained"
        );
        if leveled_up {
            info!(previous_level, new_level, "Level up");
        }

        XpAward {
            gained,
            leveled_up,
            new_level,
        }
    }

    /// Award XP for an activity at the default 1x multiplier.
    pub fn award(&mut self, activity: &Activity, now_ms: i64) -> XpAward {
        self.add_xp(activity, 1.0, now_ms)
    }

    /// Replace the cumulative total (state restore only).
    ///
    /// Negative and non-finite values clamp to zero. No gain is logged and
    /// no level-up is reported.
    pub fn set_xp(&mut self, total_xp: f64) {
        self.total_xp_earned = level::sanitize_total(total_xp);
        debug!(total = self.total_xp_earned, level = self.level(), "XP restored");
    }

    /// Jump to the start of `level` (state restore only).
    ///
    /// The total becomes the cumulative XP needed to reach `level`, clamped to
    /// `1..=MAX_LEVEL`.
    pub fn set_level(&mut self, level: u32) {
        let level = level.clamp(1, MAX_LEVEL);
        self.total_xp_earned = level::total_xp_for_level(level);
        debug!(level, total = self.total_xp_earned, "Level restored");
    }

    /// Cumulative XP ever earned.
    pub const fn total_xp_earned(&self) -> u64 {
        self.total_xp_earned
    }

    /// Current level (always at least 1).
    pub fn level(&self) -> u32 {
        level::derive(self.total_xp_earned).0
    }

    /// XP earned within the current level.
    pub fn current_xp(&self) -> u64 {
        level::derive(self.total_xp_earned).1
    }

    /// XP required to finish the current level.
    pub fn xp_for_next_level(&self) -> u64 {
        level::xp_for_level(self.level())
    }

    /// Progress through the current level.
    pub fn level_progress(&self) -> LevelProgress {
        let (level, current) = level::derive(self.total_xp_earned);
        let needed = level::xp_for_level(level);
        LevelProgress {
            current,
            needed,
            percentage: percentage(current, needed),
        }
    }

    /// Percentage through the current level, capped at 100.
    pub fn xp_progress_percent(&self) -> f64 {
        self.level_progress().percentage
    }

    /// Recent gains, oldest first.
    pub fn recent_gains(&self) -> impl ExactSizeIterator<Item = &XpGain> {
        self.recent_gains.iter()
    }

    /// Drop every entry from the recent gain log.
    pub fn clear_recent_gains(&mut self) {
        self.recent_gains.clear();
    }

    /// Capture the persisted portion of the state.
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            total_xp_earned: self.total_xp_earned as f64,
        }
    }

    /// Load a persisted snapshot. The gain log is cleared.
    pub fn restore(&mut self, snapshot: &ProgressionSnapshot) {
        self.recent_gains.clear();
        self.set_xp(snapshot.total_xp_earned);
    }
}

/// `floor(base_xp * multiplier)`, with invalid multipliers awarding 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_xp(base_xp: u32, multiplier: f64) -> u64 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return 0;
    }
    let scaled = (f64::from(base_xp) * multiplier).floor();
    // Float-to-int `as` saturates at u64::MAX.
    scaled as u64
}

#[allow(clippy::cast_precision_loss)]
fn percentage(current: u64, needed: u64) -> f64 {
    if needed == 0 {
        return 100.0;
    }
    (current as f64 / needed as f64 * 100.0).min(100.0)
}
