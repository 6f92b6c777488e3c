//! Shared key/value store.
//!
//! One namespaced store is visible to both the main app process and the
//! widget process. Every value is a whole blob replaced on each write;
//! there are no transactions and no locks. Cross-process safety rests
//! entirely on per-key atomicity of the backing implementation
//! ([`FileStore`] uses write-to-temp-then-rename), so a concurrent
//! reader observes either the old blob or the new one, never a torn mix.
//!
//! Reads are deliberately infallible: a missing or undecodable blob is
//! an empty collection, which tolerates format drift across versions.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Key names shared with previously released versions. Renaming any of
/// these breaks backward-compatible decode of existing user data.
pub mod keys {
    pub const SAVED_COUNTERS: &str = "savedCounters";
    pub const SAVED_COUNTDOWNS: &str = "savedCountdowns";
    pub const CUSTOM_THEMES: &str = "customThemes";
    pub const SELECTED_COUNTER_ID: &str = "selectedCounterId";
    pub const SELECTED_THEME_ID: &str = "selectedThemeId";
    pub const IS_PREMIUM: &str = "isPremium";
    pub const HAS_SEEN_ONBOARDING: &str = "hasSeenOnboarding";
}

/// Name of the shared group namespace inside the data directory.
pub const GROUP_ID: &str = "group.tallykit";

/// Namespaced key/value storage with whole-value replacement per key.
///
/// Implementations must make `set` atomic per key as observed by
/// concurrent readers in other processes.
pub trait KeyValueStore {
    /// Raw bytes under `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Replace the whole value under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Decode the JSON blob under `key`. Missing or corrupt data yields
    /// `T::default()`, never an error.
    fn get_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    /// Encode `value` as JSON and replace the blob under `key`.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, &bytes)
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get_json(key)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set_json(key, &value)
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_json(key, &value)
    }
}

/// Returns the TallyKit data directory, `tallykit[-dev]` under the
/// platform data dir based on TALLYKIT_ENV.
///
/// Set TALLYKIT_DATA_DIR to override the location entirely (used by
/// tests and sandboxed runs).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var("TALLYKIT_DATA_DIR") {
        Ok(explicit) => PathBuf::from(explicit),
        Err(_) => {
            let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            let env = std::env::var("TALLYKIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("tallykit-dev")
            } else {
                base.join("tallykit")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
