//! Save file envelope and storage backends.
//!
//! A save is a single JSON document:
//!
//! ```json
//! {
//!   "version": "2.0.0",
//!   "timestamp": 1700000000000,
//!   "farm": { "farmGrid": [...], "inventory": {...}, "isFirstPlant": false, ... },
//!   "progression": { "totalXPEarned": 1234 },
//!   "coins": { "count": 56 }
//! }
//! ```
//!
//! Every section is optional on load. Section contents are decoded
//! leniently (see [`pumpkin_farm::snapshot`]), so a partially corrupted file
//! still restores whatever is readable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pumpkin_farm::FarmSnapshot;
use pumpkin_xp::ProgressionSnapshot;

use crate::wallet::CoinWallet;

/// Version written into every new save.
pub const SAVE_VERSION: &str = "2.0.0";

/// Errors that can occur while reading or writing saves.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Reading, writing, or removing the save file failed.
    #[error("save file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The save could not be encoded or is not JSON at all.
    #[error("save file is not valid JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Everything persisted for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    /// Format version the save was written with.
    #[serde(default)]
    pub version: String,
    /// When the save was written, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
    /// Grid, inventory, and streak flags.
    #[serde(default)]
    pub farm: FarmSnapshot,
    /// Cumulative XP.
    #[serde(default)]
    pub progression: ProgressionSnapshot,
    /// Coin balance.
    #[serde(default)]
    pub coins: CoinWallet,
}

impl SaveData {
    /// Whether the save was written by the current format version.
    pub fn is_current_version(&self) -> bool {
        self.version == SAVE_VERSION
    }
}

/// Somewhere a single save slot can be kept.
pub trait SaveStore: Send {
    /// Write `data`, replacing any existing save.
    fn save(&mut self, data: &SaveData) -> Result<(), SaveError>;

    /// Read the save, or `None` if there is none.
    fn load(&self) -> Result<Option<SaveData>, SaveError>;

    /// Delete the save. Succeeds if there was none.
    fn clear(&mut self) -> Result<(), SaveError>;

    /// Whether a save exists.
    fn has_save(&self) -> bool;
}

/// A save slot backed by a JSON file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move an unreadable save out of the way so the next save cannot
    /// overwrite it.
    ///
    /// The file is renamed to `<name>.corrupt`, replacing any earlier one.
    /// Returns the new path, or `None` if there was no save file.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Io`] if the rename fails.
    pub fn quarantine(&self) -> Result<Option<PathBuf>, SaveError> {
        let target = self.sibling_path(".corrupt");
        match std::fs::rename(&self.path, &target) {
            Ok(()) => {
                warn!(
                    path = %self.path.display(),
                    moved_to = %target.display(),
                    "Unreadable save moved aside"
                );
                Ok(Some(target))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(data)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "Game saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveData>, SaveError> {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No save data found");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let data: SaveData = serde_json::from_slice(&contents)?;
        info!(
            path = %self.path.display(),
            version = data.version,
            timestamp = data.timestamp,
            "Save data loaded"
        );
        Ok(Some(data))
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Save data cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn has_save(&self) -> bool {
        self.path.is_file()
    }
}

/// A save slot held in memory, for embedding and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    slot: Option<SaveData>,
    writes: u64,
}

impl MemoryStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            slot: None,
            writes: 0,
        }
    }

    /// Number of successful saves.
    pub const fn writes(&self) -> u64 {
        self.writes
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        self.slot = Some(data.clone());
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveData>, SaveError> {
        Ok(self.slot.clone())
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        self.slot = None;
        Ok(())
    }

    fn has_save(&self) -> bool {
        self.slot.is_some()
    }
}
