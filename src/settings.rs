/// Durable settings storage
///
/// The only value persisted by this crate is the mute flag, stored as an int
/// under [`MUTED_PREF_KEY`]. The store trait mirrors that narrow contract:
/// integer values under string keys, absent keys reading as 0.
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Key under which the mute flag is persisted (0 = audible, 1 = muted).
pub const MUTED_PREF_KEY: &str = "SoundManager_IsAudioMuted";

pub trait SettingsStore: Send {
    fn has(&self, key: &str) -> bool;

    /// Stored value for `key`, or 0 when absent.
    fn get_int(&self, key: &str) -> i32;

    fn set_int(&mut self, key: &str, value: i32);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsData {
    #[serde(default)]
    values: HashMap<String, i32>,
}

/// JSON-file settings store.
///
/// Values are written through on every `set_int`, so a process crash after a
/// mutation loses nothing. Write failures are logged and the in-memory value
/// stands; there is no durable-write guarantee a caller could act on anyway.
pub struct JsonSettings {
    path: PathBuf,
    data: PrefsData,
}

impl JsonSettings {
    /// Load the store at `path`. A missing file starts an empty store; a
    /// file that exists but cannot be read or parsed is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                data: PrefsData::default(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| SettingsError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let data = serde_json::from_str(&content).map_err(|e| SettingsError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(Self { path, data })
    }

    /// Default location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("soundbank").join("settings.json"))
    }

    fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::SaveFailed {
                path: self.path.display().to_string(),
                source: Box::new(e),
            })?;
        }

        let json = serde_json::to_string_pretty(&self.data).map_err(|e| {
            SettingsError::SaveFailed {
                path: self.path.display().to_string(),
                source: Box::new(e),
            }
        })?;
        fs::write(&self.path, json).map_err(|e| SettingsError::SaveFailed {
            path: self.path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn has(&self, key: &str) -> bool {
        self.data.values.contains_key(key)
    }

    fn get_int(&self, key: &str) -> i32 {
        self.data.values.get(key).copied().unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.data.values.insert(key.to_string(), value);
        if let Err(e) = self.save() {
            tracing::error!("Failed to persist settings: {}", e);
        }
    }
}

/// In-memory settings store for tests and headless hosts.
///
/// Clones share the same underlying map, so one clone can be handed to a
/// consumer while another observes (or pre-populates) the stored values.
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    values: Arc<Mutex<HashMap<String, i32>>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn has(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }

    fn get_int(&self, key: &str) -> i32 {
        self.values.lock().get(key).copied().unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.lock().insert(key.to_string(), value);
    }
}
