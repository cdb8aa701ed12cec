//! Growth and autosave loop for a running session.
//!
//! [`run_session`] drives a [`GameSession`] in real time:
//!
//! - **Growth**: `update_growth` every `growth_tick_interval_ms`
//! - **Autosave**: a save every `autosave_interval_ms` (0 disables)
//! - **Bounded run**: stop after `max_ticks` growth ticks (0 is unbounded)
//! - **Clean shutdown**: stop when the shutdown future resolves, then save
//!
//! A failed autosave is logged and the loop keeps going; only the final
//! save can fail the run.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::config::TimingConfig;
use crate::save::{SaveError, SaveStore};
use crate::session::GameSession;

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The final save on shutdown failed.
    #[error("final save failed: {source}")]
    Save {
        /// The underlying save error.
        #[from]
        source: SaveError,
    },
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The shutdown future resolved.
    Shutdown,
    /// `max_ticks` growth ticks ran.
    MaxTicksReached,
}

/// Result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// Growth ticks executed.
    pub ticks: u64,
    /// Successful saves, including the final one.
    pub saves: u64,
    /// Stage transitions across all ticks.
    pub stages_advanced: u64,
}

/// Run the growth and autosave loop until shutdown or the tick bound.
///
/// The first growth tick and the first autosave happen one full interval
/// after the call, not immediately.
///
/// # Errors
///
/// Returns [`RunnerError::Save`] if the final save fails.
pub async fn run_session<F>(
    session: &mut GameSession,
    store: &mut dyn SaveStore,
    timing: &TimingConfig,
    shutdown: F,
) -> Result<RunSummary, RunnerError>
where
    F: Future<Output = ()>,
{
    let growth_period = Duration::from_millis(timing.growth_tick_interval_ms.max(1));
    let autosave_enabled = timing.autosave_interval_ms > 0;
    let autosave_period = Duration::from_millis(timing.autosave_interval_ms.max(1));

    let start = Instant::now();
    let mut growth = interval_at(after(start, growth_period), growth_period);
    growth.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut autosave = interval_at(after(start, autosave_period), autosave_period);
    autosave.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks: u64 = 0;
    let mut saves: u64 = 0;
    let mut stages_advanced: u64 = 0;

    info!(
        growth_tick_interval_ms = timing.growth_tick_interval_ms,
        autosave_interval_ms = timing.autosave_interval_ms,
        max_ticks = timing.max_ticks,
        "Session loop starting"
    );

    tokio::pin!(shutdown);

    let end_reason = loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("Shutdown requested");
                break RunEndReason::Shutdown;
            }

            _ = growth.tick() => {
                ticks = ticks.saturating_add(1);
                let advanced = session.update_growth();
                stages_advanced = stages_advanced.saturating_add(u64::from(advanced));
                debug!(tick = ticks, advanced, "Growth tick");

                if timing.max_ticks > 0 && ticks >= timing.max_ticks {
                    info!(ticks, max_ticks = timing.max_ticks, "Tick limit reached");
                    break RunEndReason::MaxTicksReached;
                }
            }

            _ = autosave.tick(), if autosave_enabled => {
                match store.save(&session.save_data()) {
                    Ok(()) => saves = saves.saturating_add(1),
                    Err(err) => warn!(error = %err, "Autosave failed"),
                }
            }
        }
    };

    store.save(&session.save_data())?;
    saves = saves.saturating_add(1);

    let summary = RunSummary {
        end_reason,
        ticks,
        saves,
        stages_advanced,
    };
    info!(
        reason = ?summary.end_reason,
        ticks = summary.ticks,
        saves = summary.saves,
        stages_advanced = summary.stages_advanced,
        "Session loop ended"
    );
    Ok(summary)
}

fn after(start: Instant, period: Duration) -> Instant {
    start.checked_add(period).unwrap_or(start)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pumpkin_types::GrowthStage;

    use super::*;
    use crate::clock::ManualClock;
    use crate::config::GameConfig;
    use crate::save::{MemoryStore, SaveData};

    const T0: i64 = 1_700_000_000_000;

    fn make_session() -> (GameSession, ManualClock) {
        let clock = ManualClock::new(T0);
        let session = GameSession::new(&GameConfig::default(), Box::new(clock.clone())).unwrap();
        (session, clock)
    }

    fn timing(max_ticks: u64) -> TimingConfig {
        TimingConfig {
            growth_tick_interval_ms: 2_000,
            autosave_interval_ms: 10_000,
            max_ticks,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_by_max_ticks() {
        let (mut session, _) = make_session();
        let mut store = MemoryStore::new();

        let summary = run_session(
            &mut session,
            &mut store,
            &timing(5),
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(summary.end_reason, RunEndReason::MaxTicksReached);
        assert_eq!(summary.ticks, 5);
        // The fifth tick lands on the autosave instant and wins; only the
        // final save is written.
        assert_eq!(summary.saves, 1);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn autosaves_on_interval() {
        let (mut session, _) = make_session();
        let mut store = MemoryStore::new();

        let summary = run_session(
            &mut session,
            &mut store,
            &timing(11),
            std::future::pending(),
        )
        .await
        .unwrap();

        // Autosaves at 10 s and 20 s, then the final save at 22 s.
        assert_eq!(summary.ticks, 11);
        assert_eq!(summary.saves, 3);
        assert_eq!(store.writes(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_can_be_disabled() {
        let (mut session, _) = make_session();
        let mut store = MemoryStore::new();
        let config = TimingConfig {
            autosave_interval_ms: 0,
            ..timing(20)
        };

        let summary = run_session(&mut session, &mut store, &config, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.saves, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_and_saves() {
        let (mut session, _) = make_session();
        let mut store = MemoryStore::new();

        let summary = run_session(
            &mut session,
            &mut store,
            &timing(0),
            tokio::time::sleep(Duration::from_millis(5_000)),
        )
        .await
        .unwrap();

        assert_eq!(summary.end_reason, RunEndReason::Shutdown);
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.saves, 1);
        assert!(store.has_save());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_advance_crops() {
        let (mut session, clock) = make_session();
        assert!(session.plant(0, 0, None));
        assert!(session.plant(0, 1, None));
        clock.advance(60_000);
        let mut store = MemoryStore::new();

        let summary = run_session(
            &mut session,
            &mut store,
            &timing(3),
            std::future::pending(),
        )
        .await
        .unwrap();

        // The session clock does not move during the run, so each crop
        // advances exactly once.
        assert_eq!(summary.stages_advanced, 2);
        assert_eq!(session.farm().stage_totals().get(GrowthStage::Sprout), 2);

        let saved: SaveData = store.load().unwrap().unwrap();
        assert_eq!(saved.farm.farm_grid.len(), 8);
    }

    #[derive(Debug)]
    struct FailingStore;

    impl SaveStore for FailingStore {
        fn save(&mut self, _data: &SaveData) -> Result<(), SaveError> {
            Err(SaveError::Io {
                source: std::io::Error::other("disk full"),
            })
        }

        fn load(&self) -> Result<Option<SaveData>, SaveError> {
            Ok(None)
        }

        fn clear(&mut self) -> Result<(), SaveError> {
            Ok(())
        }

        fn has_save(&self) -> bool {
            false
        }
    }

    #[tokio::test(start_paused = true)]
    async fn final_save_failure_is_reported() {
        let (mut session, _) = make_session();
        let mut store = FailingStore;

        let result = run_session(
            &mut session,
            &mut store,
            &timing(6),
            std::future::pending(),
        )
        .await;

        assert!(matches!(result, Err(RunnerError::Save { .. })));
    }
}
