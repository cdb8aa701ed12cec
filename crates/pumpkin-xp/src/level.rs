//! The level formula.
//!
//! XP required to advance from level `L` to `L + 1` is `floor(100 * L^1.5)`.
//! The cumulative XP needed to reach level `L` is the sum of those
//! requirements for levels `1..L`. The current level for a given total is the
//! largest `L` whose cumulative threshold does not exceed the total.
//!
//! | Level | Requirement | Cumulative to reach |
//! |-------|-------------|---------------------|
//! | 1     | 100         | 0                   |
//! | 2     | 282         | 100                 |
//! | 3     | 519         | 382                 |
//! | 4     | 800         | 901                 |
//!
//! Level and in-level progress are always derived from the total; they are
//! never stored.

/// Highest level the derivation will report.
///
/// Reaching it takes roughly 4 * 10^11 XP, far beyond gameplay; the cap
/// bounds the derivation loop for pathological restored totals.
///
/// At the cap, XP keeps accumulating into the final level, so the in-level
/// XP can exceed [`xp_for_level`]`(MAX_LEVEL)`. Progress percentages are
/// clamped to 100 in that case.
pub const MAX_LEVEL: u32 = 10_000;

/// XP required to advance from `level` to `level + 1`.
///
/// Computed exactly as `isqrt(10_000 * level^3)`, which equals
/// `floor(100 * level^1.5)` without floating-point rounding. Level 0 needs 0.
pub fn xp_for_level(level: u32) -> u64 {
    let l = u128::from(level);
    let radicand = l
        .saturating_mul(l)
        .saturating_mul(l)
        .saturating_mul(10_000);
    u64::try_from(radicand.isqrt()).unwrap_or(u64::MAX)
}

/// Cumulative XP needed to reach `level` from level 1.
///
/// Levels below 1 are treated as level 1 (0 XP). Saturates at `u64::MAX`.
pub fn total_xp_for_level(level: u32) -> u64 {
    (1..level.min(MAX_LEVEL)).fold(0_u64, |acc, l| acc.saturating_add(xp_for_level(l)))
}

/// Current level for a cumulative XP total.
pub fn level_from_xp(total_xp: u64) -> u32 {
    derive(total_xp).0
}

/// Derive `(level, xp_into_level)` from a cumulative total in one pass.
pub(crate) fn derive(total_xp: u64) -> (u32, u64) {
    let mut level: u32 = 1;
    let mut accumulated: u64 = 0;

    while level < MAX_LEVEL {
        let needed = xp_for_level(level);
        let Some(next_threshold) = accumulated.checked_add(needed) else {
            break;
        };
        if next_threshold > total_xp {
            break;
        }
        accumulated = next_threshold;
        level = level.saturating_add(1);
    }

    (level, total_xp.saturating_sub(accumulated))
}

/// Convert a restored (untrusted) XP total into a valid one.
///
/// Negative and non-finite values clamp to zero; fractional values floor.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn sanitize_total(raw: f64) -> u64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    // Float-to-int `as` saturates at u64::MAX.
    raw.floor() as u64
}
