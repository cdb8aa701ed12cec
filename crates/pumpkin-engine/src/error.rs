//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the session loop.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: pumpkin_core::ConfigError,
    },

    /// The farm could not be built from the configuration.
    #[error("farm error: {source}")]
    Farm {
        /// The underlying farm error.
        #[from]
        source: pumpkin_farm::FarmError,
    },

    /// An unreadable save file could not be moved aside.
    #[error("save error: {source}")]
    Save {
        /// The underlying save error.
        #[from]
        source: pumpkin_core::SaveError,
    },

    /// The session loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: pumpkin_core::RunnerError,
    },
}
