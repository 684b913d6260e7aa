//! Key-value persistence
//!
//! Features:
//! - Backend trait (`LocalStore` in the browser, `MemoryStore` elsewhere)
//! - Versioned JSON envelope on every structured record
//! - Fail-soft facade: storage errors are logged, never returned

pub mod session_save;
pub mod stats;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::StorageError;
use crate::highscores::Leaderboard;
use crate::settings::Settings;

pub use session_save::{SavedStructure, SessionSave};
pub use stats::{LifetimeStats, StatName, StatsTracker};

pub const HIGH_SCORE_KEY: &str = "spaceDevGameHighScore";
pub const SESSION_KEY: &str = "spaceDevGameSave";
pub const STATS_KEY: &str = "spaceDevGameStats";
pub const LEADERBOARD_KEY: &str = "spaceDevGameLeaderboard";
pub const SETTINGS_KEY: &str = "spaceDevGameSettings";

/// Current record format. Records with any other version are ignored.
pub const RECORD_VERSION: u32 = 1;

/// String key-value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every operation (storage disabled)
    pub fn unavailable() -> Self {
        Self {
            entries: BTreeMap::new(),
            unavailable: true,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
fn js_reason(err: wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: js_reason(e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: js_reason(e),
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| StorageError::Remove {
            key: key.to_string(),
            reason: js_reason(e),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

/// Everything exported by "download my data"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportBundle {
    version: u32,
    high_score: u64,
    stats: LifetimeStats,
    leaderboard: Leaderboard,
    settings: Settings,
}

/// Fail-soft facade over a `KeyValueStore`.
///
/// Every read returns a default when the backend fails or the record is
/// missing, corrupt or from another version. Every write logs and
/// carries on.
pub struct GameStorage {
    store: Box<dyn KeyValueStore>,
}

impl GameStorage {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Backed by a fresh `MemoryStore`
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Storage read failed: {e}");
                None
            }
        }
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("Storage write failed: {e}");
        }
    }

    pub fn remove(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            log::warn!("Storage remove failed: {e}");
        }
    }

    /// Read a versioned record
    pub fn load_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.read_raw(key)?;
        let envelope: Envelope<serde_json::Value> = match serde_json::from_str(&json) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("Ignoring corrupt record {key}: {e}");
                return None;
            }
        };
        if envelope.version != RECORD_VERSION {
            log::warn!(
                "Ignoring record {key} with unknown version {}",
                envelope.version
            );
            return None;
        }
        match serde_json::from_value(envelope.data) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Ignoring malformed record {key}: {e}");
                None
            }
        }
    }

    /// Write a versioned record
    pub fn save_record<T: Serialize>(&mut self, key: &str, data: &T) {
        let envelope = Envelope {
            version: RECORD_VERSION,
            data,
        };
        match serde_json::to_string(&envelope) {
            Ok(json) => self.write_raw(key, &json),
            Err(e) => log::warn!(
                "{}",
                StorageError::Encode {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            ),
        }
    }

    /// Best score ever (bare integer record)
    pub fn high_score(&self) -> u64 {
        self.read_raw(HIGH_SCORE_KEY)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Store `score` if it beats the current best; returns whether it did
    pub fn submit_high_score(&mut self, score: u64) -> bool {
        if score <= self.high_score() {
            return false;
        }
        self.write_raw(HIGH_SCORE_KEY, &score.to_string());
        log::info!("New high score: {score}");
        true
    }

    pub fn save_session(&mut self, save: &SessionSave) {
        self.save_record(SESSION_KEY, save);
        log::debug!("Session saved (score {}, level {})", save.score, save.level);
    }

    /// The saved session, if present, consistent with `config` and within
    /// its retention window. Invalid or stale saves are deleted.
    pub fn load_session(&mut self, now: f64, config: &GameConfig) -> Option<SessionSave> {
        let save: Option<SessionSave> = self.load_record(SESSION_KEY);
        let retention_ms = config.persistence.retention_ms;
        match save {
            Some(save) if save.is_valid(config) && !save.is_stale(now, retention_ms) => Some(save),
            Some(_) => {
                log::info!("Discarding invalid or stale session save");
                self.clear_session();
                None
            }
            None => None,
        }
    }

    pub fn clear_session(&mut self) {
        self.remove(SESSION_KEY);
    }

    pub fn load_stats(&self) -> LifetimeStats {
        self.load_record(STATS_KEY).unwrap_or_default()
    }

    pub fn save_stats(&mut self, stats: &LifetimeStats) {
        self.save_record(STATS_KEY, stats);
    }

    pub fn load_leaderboard(&self) -> Leaderboard {
        let mut board: Leaderboard = self.load_record(LEADERBOARD_KEY).unwrap_or_default();
        board.normalize();
        board
    }

    pub fn save_leaderboard(&mut self, board: &Leaderboard) {
        self.save_record(LEADERBOARD_KEY, board);
    }

    pub fn load_settings(&self) -> Settings {
        self.load_record(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        self.save_record(SETTINGS_KEY, settings);
    }

    /// Delete every record this game owns
    pub fn clear_all(&mut self) {
        for key in [
            HIGH_SCORE_KEY,
            SESSION_KEY,
            STATS_KEY,
            LEADERBOARD_KEY,
            SETTINGS_KEY,
        ] {
            self.remove(key);
        }
        log::info!("All game data cleared");
    }

    /// Pretty JSON bundle of high score, stats, leaderboard and settings
    pub fn export_json(&self) -> String {
        let bundle = ExportBundle {
            version: RECORD_VERSION,
            high_score: self.high_score(),
            stats: self.load_stats(),
            leaderboard: self.load_leaderboard(),
            settings: self.load_settings(),
        };
        serde_json::to_string_pretty(&bundle).unwrap_or_else(|e| {
            log::warn!("Export failed: {e}");
            String::from("{}")
        })
    }

    /// Restore a bundle produced by `export_json`. Returns false (and
    /// changes nothing) when the document is not a valid bundle.
    pub fn import_json(&mut self, json: &str) -> bool {
        let bundle: ExportBundle = match serde_json::from_str(json) {
            Ok(bundle) => bundle,
            Err(e) => {
                log::warn!("Import rejected: {e}");
                return false;
            }
        };
        if bundle.version != RECORD_VERSION {
            log::warn!("Import rejected: unknown version {}", bundle.version);
            return false;
        }
        let mut leaderboard = bundle.leaderboard;
        leaderboard.normalize();

        self.write_raw(HIGH_SCORE_KEY, &bundle.high_score.to_string());
        self.save_stats(&bundle.stats);
        self.save_leaderboard(&leaderboard);
        self.save_settings(&bundle.settings);
        log::info!("Imported game data");
        true
    }
}
