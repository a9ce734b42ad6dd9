// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Preference store kept in a shared map.

use isotile_app_core::config::{ConfigError, ConfigStore};
use isotile_app_core::prefs::{ViewPrefs, VIEW_PREFS_KEY};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// [`ConfigStore`] over a map shared between clones.
///
/// Hand one clone to the code under test and keep another for seeding
/// blobs and counting traffic.
///
/// ```
/// use isotile_app_core::config::ConfigService;
/// use isotile_app_core::prefs::ViewPrefs;
/// use isotile_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let prefs = ConfigService::new(store.clone());
/// prefs.save_view_prefs(&ViewPrefs::default());
/// assert_eq!(store.writes(), 1);
/// assert_eq!(prefs.load_view_prefs(), ViewPrefs::default());
/// assert_eq!(store.reads(), 1);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    shared: Arc<Mutex<Blobs>>,
}

#[derive(Default)]
struct Blobs {
    by_key: BTreeMap<String, Vec<u8>>,
    reads: usize,
    writes: usize,
    broken: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `prefs` as JSON under [`VIEW_PREFS_KEY`].
    pub fn with_view_prefs(prefs: &ViewPrefs) -> Self {
        let store = Self::new();
        store.seed(VIEW_PREFS_KEY, &serde_json::to_vec(prefs).unwrap_or_default());
        store
    }

    /// Put `bytes` under `key` without counting a write.
    pub fn seed(&self, key: &str, bytes: &[u8]) {
        self.blobs().by_key.insert(key.to_owned(), bytes.to_vec());
    }

    /// While set, every read fails with [`ConfigError::Other`].
    pub fn break_reads(&self, broken: bool) {
        self.blobs().broken = broken;
    }

    /// Reads attempted so far, failed ones included.
    pub fn reads(&self) -> usize {
        self.blobs().reads
    }

    /// Writes performed so far.
    pub fn writes(&self) -> usize {
        self.blobs().writes
    }

    /// Raw bytes under `key`, if any.
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs().by_key.get(key).cloned()
    }

    fn blobs(&self) -> MutexGuard<'_, Blobs> {
        self.shared.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn read(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut blobs = self.blobs();
        blobs.reads += 1;
        if blobs.broken {
            return Err(ConfigError::Other(format!("read of `{key}` refused")));
        }
        blobs
            .by_key
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(key.to_owned()))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        let mut blobs = self.blobs();
        blobs.writes += 1;
        blobs.by_key.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}
