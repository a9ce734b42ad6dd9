// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for isotile hosts (uses platform config dir).

use directories::ProjectDirs;
use isotile_app_core::config::{ConfigError, ConfigStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store configs as JSON files under one directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/isotile`).
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("dev", "flyingrobots", "isotile")
            .ok_or_else(|| ConfigError::Other("no home directory to place config in".into()))?;
        Self::at(dirs.config_dir())
    }

    /// Create a store rooted at an explicit directory.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    /// Directory holding the config files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn read(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        fs::read(self.path_for(key)).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(key.to_owned()),
            _ => ConfigError::Io(err),
        })
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        // Write-then-rename so a crash never leaves half a file behind.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "config written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use isotile_app_core::config::ConfigService;
    use isotile_app_core::prefs::ViewPrefs;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
        assert_eq!(svc.load_view_prefs(), ViewPrefs::default());
    }

    #[test]
    fn saved_prefs_are_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
        let prefs = ViewPrefs {
            server_url: "http://tiles.example:9000".into(),
            refresh_interval_ms: 500,
            ..ViewPrefs::default()
        };
        svc.save_view_prefs(&prefs);
        assert!(dir.path().join("view_prefs.json").exists());
        assert_eq!(svc.load_view_prefs(), prefs);
        assert!(!dir.path().join("view_prefs.json.tmp").exists());
    }

    #[test]
    fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path().join("nested")).unwrap();
        assert!(matches!(store.read("absent"), Err(ConfigError::NotFound(k)) if k == "absent"));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("view_prefs.json"), b"{ nope").unwrap();
        let svc = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
        assert_eq!(svc.load_view_prefs(), ViewPrefs::default());
    }
}
