// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Preference storage: a byte-level store port plus a JSON service on top.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::prefs::{ViewPrefs, VIEW_PREFS_KEY};

/// Where preference blobs live, addressed by key.
pub trait ConfigStore {
    /// Bytes stored under `key`, or [`ConfigError::NotFound`].
    fn read(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace whatever is stored under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError>;
}

/// Failures reading or writing preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("no config stored under `{0}`")]
    NotFound(String),
    /// Backing storage failed.
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    /// Stored bytes are not the expected JSON.
    #[error("config json: {0}")]
    Serde(#[from] serde_json::Error),
    /// Anything the store cannot express otherwise.
    #[error("config: {0}")]
    Other(String),
}

/// JSON (de)serialization over a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Service over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Value under `key`; `Ok(None)` when absent or empty.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let bytes = match self.store.read(key) {
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Store `value` under `key` as pretty JSON.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.store.write(key, &bytes)
    }

    /// View prefs, validated. Missing or unreadable prefs yield defaults.
    pub fn load_view_prefs(&self) -> ViewPrefs {
        match self.get::<ViewPrefs>(VIEW_PREFS_KEY) {
            Ok(Some(prefs)) => prefs.validated(),
            Ok(None) => {
                debug!("no stored view prefs; using defaults");
                ViewPrefs::default()
            }
            Err(err) => {
                warn!(error = %err, "view prefs unreadable; using defaults");
                ViewPrefs::default()
            }
        }
    }

    /// Persist view prefs. Failures are logged, not returned.
    pub fn save_view_prefs(&self, prefs: &ViewPrefs) {
        if let Err(err) = self.put(VIEW_PREFS_KEY, prefs) {
            warn!(error = %err, "could not persist view prefs");
        }
    }
}
