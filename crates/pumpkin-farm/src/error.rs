//! Error types for the `pumpkin-farm` crate.
//!
//! Gameplay rejections (occupied plot, no seeds, immature crop) are expected
//! outcomes and are reported as `false`, never as errors. [`FarmError`] only
//! covers configurations that cannot describe a farm at all.

/// Errors that can occur while constructing a farm.
#[derive(Debug, thiserror::Error)]
pub enum FarmError {
    /// The farm configuration is unusable.
    #[error("invalid farm configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}
