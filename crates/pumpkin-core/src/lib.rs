//! Game session, configuration, persistence, and growth scheduling for the
//! Pumpkin Patch farming game.
//!
//! This crate ties the farm and progression engines into a playable game.
//! A [`GameSession`] owns every piece of state for one player; the runner
//! ticks it in real time and autosaves it through a [`SaveStore`].
//!
//! # Modules
//!
//! - [`clock`] -- [`GameClock`] time sources: [`SystemClock`] and
//!   [`ManualClock`].
//! - [`config`] -- Configuration loading from `pumpkin-config.yaml` into
//!   strongly-typed structs.
//! - [`runner`] -- The async growth and autosave loop.
//! - [`save`] -- Save envelope, [`SaveStore`] trait, and the JSON file store.
//! - [`session`] -- [`GameSession`], the per-player context object.
//! - [`wallet`] -- [`CoinWallet`], the coin balance.

pub mod clock;
pub mod config;
pub mod runner;
pub mod save;
pub mod session;
pub mod wallet;

pub use clock::{GameClock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use runner::{RunEndReason, RunSummary, RunnerError, run_session};
pub use save::{JsonFileStore, MemoryStore, SAVE_VERSION, SaveData, SaveError, SaveStore};
pub use session::GameSession;
pub use wallet::CoinWallet;
