//! Progress persistence keyed by player identity
//!
//! Features:
//! - JSON records with a format version
//! - In-memory store (tests, headless runs)
//! - File store with tmp-then-rename writes (native)
//! - LocalStorage store (web)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

use std::collections::HashMap;

use thiserror::Error;

use crate::progress::{ProgressRecord, SAVE_VERSION};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

/// Key prefix for saved records
pub const SAVE_PREFIX: &str = "juizo_save_";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize progress: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to parse saved progress: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage key for a player
pub fn save_key(player: &str) -> String {
    format!("{SAVE_PREFIX}{player}")
}

pub fn encode(record: &ProgressRecord) -> Result<String, PersistError> {
    serde_json::to_string(record).map_err(PersistError::Serialize)
}

/// Parse a stored record. Records from a newer format are refused rather
/// than silently truncated.
pub fn decode(json: &str) -> Result<ProgressRecord, PersistError> {
    let record: ProgressRecord = serde_json::from_str(json).map_err(PersistError::Deserialize)?;
    if record.version > SAVE_VERSION {
        return Err(PersistError::Unavailable(format!(
            "save format {} is newer than supported {}",
            record.version, SAVE_VERSION
        )));
    }
    Ok(record)
}

/// A key-value store for progress records
pub trait ProgressStore {
    /// Saved record for `player`, or `None` if nothing was saved yet
    fn load(&self, player: &str) -> Result<Option<ProgressRecord>, PersistError>;

    fn save(&mut self, player: &str, record: &ProgressRecord) -> Result<(), PersistError>;
}

/// Store backed by a map of JSON strings
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Number of upcoming saves that fail with `Unavailable`
    pub failing_saves: u32,
    /// Successful saves so far
    pub save_count: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored JSON for a player
    pub fn raw(&self, player: &str) -> Option<&str> {
        self.entries.get(&save_key(player)).map(String::as_str)
    }

    pub fn insert_raw(&mut self, player: &str, json: impl Into<String>) {
        self.entries.insert(save_key(player), json.into());
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, player: &str) -> Result<Option<ProgressRecord>, PersistError> {
        self.entries.get(&save_key(player)).map(|json| decode(json)).transpose()
    }

    fn save(&mut self, player: &str, record: &ProgressRecord) -> Result<(), PersistError> {
        if self.failing_saves > 0 {
            self.failing_saves -= 1;
            return Err(PersistError::Unavailable("memory store offline".to_string()));
        }
        let json = encode(record)?;
        self.entries.insert(save_key(player), json);
        self.save_count += 1;
        Ok(())
    }
}
