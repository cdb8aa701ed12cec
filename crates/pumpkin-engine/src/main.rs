//! Headless engine binary for the Pumpkin Patch farming game.
//!
//! Runs one game session without a UI: crops grow on the configured tick,
//! the game autosaves, and Ctrl-C (or `timing.max_ticks`) stops it with a
//! final save. A UI process can share the save file between runs.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pumpkin-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration
//! 4. Build the game session on the system clock
//! 5. Restore the save file, if any (an unreadable one is moved aside)
//! 6. Run the growth and autosave loop
//! 7. Log the result

mod error;

use std::path::Path;

use pumpkin_core::{
    GameConfig, GameSession, JsonFileStore, SaveStore, SystemClock, run_session,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "pumpkin-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, session setup, or the final save fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember whether the
    //    file was found and report it below.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config);
    info!("pumpkin-engine starting");
    if from_file {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }

    // 3. Validate configuration.
    config.validate().map_err(EngineError::from)?;
    info!(
        grid_size = config.farm.grid_size,
        growth_tick_interval_ms = config.timing.growth_tick_interval_ms,
        autosave_interval_ms = config.timing.autosave_interval_ms,
        max_ticks = config.timing.max_ticks,
        save_path = %config.save.path.display(),
        "Configuration validated"
    );

    // 4. Build the session.
    let mut session =
        GameSession::new(&config, Box::new(SystemClock)).map_err(EngineError::from)?;

    // 5. Restore the previous game.
    let mut store = JsonFileStore::new(config.save.path.clone());
    match store.load() {
        Ok(Some(save)) => session.restore(save),
        Ok(None) => info!("Starting fresh game"),
        Err(err) => {
            // Keep the unreadable file so the first autosave cannot replace it.
            warn!(error = %err, "Save file unreadable, starting fresh game");
            if let Some(moved) = store.quarantine().map_err(EngineError::from)? {
                info!(path = %moved.display(), "Unreadable save kept for inspection");
            }
        }
    }

    // 6. Run until Ctrl-C or the tick bound.
    let summary = run_session(&mut session, &mut store, &config.timing, shutdown_signal())
        .await
        .map_err(EngineError::from)?;

    // 7. Log results.
    let progress = session.progression().level_progress();
    info!(
        end_reason = ?summary.end_reason,
        ticks = summary.ticks,
        saves = summary.saves,
        stages_advanced = summary.stages_advanced,
        level = session.progression().level(),
        level_progress_percent = progress.percentage,
        coins = session.coins(),
        "pumpkin-engine shutdown complete"
    );

    Ok(())
}

/// Load `pumpkin-config.yaml`, falling back to defaults when it is absent.
///
/// Returns the configuration and whether it came from the file.
fn load_config() -> Result<(GameConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((GameConfig::from_file(config_path)?, true))
    } else {
        let mut config = GameConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level` when set.
fn init_logging(config: &GameConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Resolve on Ctrl-C. If the handler cannot be installed, never resolve and
/// rely on `timing.max_ticks` or process termination instead.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
