//! Score slot persistence
//!
//! Three numeric slots: the last score, and the best score for each game
//! type. The game reads them once at construction and writes them on
//! game-over, then asks the store to flush.
//!
//! Backends:
//! - `MemoryStore`: process lifetime only (tests, headless runs)
//! - `JsonFileStore`: JSON file on disk (native)
//! - `LocalStore`: browser LocalStorage (wasm)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named score slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Current / last score
    Current,
    /// Best score for game A
    BestA,
    /// Best score for game B
    BestB,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Current, Slot::BestA, Slot::BestB];
}

/// Failure while writing slots out
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode score slots: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary used by the game
pub trait ScoreStore {
    fn get(&self, slot: Slot) -> u32;

    fn set(&mut self, slot: Slot, value: u32);

    /// Push pending writes to the backing medium
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Serialized slot values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSlots {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub best_a: u32,
    #[serde(default)]
    pub best_b: u32,
}

impl SaveSlots {
    pub fn get(&self, slot: Slot) -> u32 {
        match slot {
            Slot::Current => self.current,
            Slot::BestA => self.best_a,
            Slot::BestB => self.best_b,
        }
    }

    pub fn set(&mut self, slot: Slot, value: u32) {
        match slot {
            Slot::Current => self.current = value,
            Slot::BestA => self.best_a = value,
            Slot::BestB => self.best_b = value,
        }
    }

    /// Parse stored JSON, falling back to zeroed slots on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(slots) => slots,
            Err(e) => {
                log::warn!("Discarding unreadable score slots: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Slots kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: SaveSlots,
    flushes: u32,
}

impl MemoryStore {
    pub fn new(slots: SaveSlots) -> Self {
        Self { slots, flushes: 0 }
    }

    pub fn slots(&self) -> SaveSlots {
        self.slots
    }

    /// Number of successful flushes so far
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, slot: Slot) -> u32 {
        self.slots.get(slot)
    }

    fn set(&mut self, slot: Slot, value: u32) {
        self.slots.set(slot, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Slots stored as JSON in a file
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    slots: SaveSlots,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open `path`, starting from zeroed slots when it is missing or unreadable
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let slots = match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loaded score slots from {}", path.display());
                SaveSlots::from_json(&json)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SaveSlots::default(),
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                SaveSlots::default()
            }
        };
        Self { path, slots }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn get(&self, slot: Slot) -> u32 {
        self.slots.get(slot)
    }

    fn set(&mut self, slot: Slot, value: u32) {
        self.slots.set(slot, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let json = self.slots.to_json()?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        log::debug!("Score slots saved to {}", self.path.display());
        Ok(())
    }
}

/// Slots stored in browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    slots: SaveSlots,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    const STORAGE_KEY: &'static str = "junior_watch_scores";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    pub fn load() -> Self {
        let slots = Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .map(|json| SaveSlots::from_json(&json))
            .unwrap_or_default();
        log::info!("Loaded score slots from LocalStorage");
        Self { slots }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn get(&self, slot: Slot) -> u32 {
        self.slots.get(slot)
    }

    fn set(&mut self, slot: Slot, value: u32) {
        self.slots.set(slot, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Unavailable("no LocalStorage".to_string()))?;
        let json = self.slots.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        Ok(())
    }
}
