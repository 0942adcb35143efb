// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Installed-version marker persistence

use crate::error::{Result, UpdateError};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable record of the installed version
pub trait VersionStore: Send + Sync {
    fn load(&self) -> Result<String>;

    /// Replace the stored version. Must be durable once this returns `Ok`.
    fn save(&self, version: &str) -> Result<()>;
}

/// Plain-text version file (e.g. `version.txt`)
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    path: PathBuf,
}

impl FileVersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionStore for FileVersionStore {
    fn load(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            UpdateError::Persistence(format!(
                "Failed to read {}: {e} (run from the installation directory)",
                self.path.display()
            ))
        })?;

        let version = content.trim();
        if version.is_empty() {
            return Err(UpdateError::Persistence(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(version.to_owned())
    }

    fn save(&self, version: &str) -> Result<()> {
        let temp_path = self.path.with_extension("tmp");
        let persist = || -> std::io::Result<()> {
            let mut file = std::fs::File::create(&temp_path)?;
            file.write_all(version.as_bytes())?;
            file.sync_all()?;
            // Atomic write
            std::fs::rename(&temp_path, &self.path)
        };

        persist().map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            UpdateError::Persistence(format!(
                "Failed to write {}: {e}",
                self.path.display()
            ))
        })
    }
}

/// In-memory store, keeps every saved value in order
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    current: Mutex<String>,
    history: Mutex<Vec<String>>,
}

impl MemoryVersionStore {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(version.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Values passed to `save`, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }
}

impl VersionStore for MemoryVersionStore {
    fn load(&self) -> Result<String> {
        Ok(self.current.lock().clone())
    }

    fn save(&self, version: &str) -> Result<()> {
        *self.current.lock() = version.to_owned();
        self.history.lock().push(version.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("version.txt");
        std::fs::write(&path, "1.0.0\n").unwrap();

        let store = FileVersionStore::new(&path);
        assert_eq!(store.load().unwrap(), "1.0.0");
    }

    #[test]
    fn test_load_missing_or_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path().join("version.txt"));
        assert!(matches!(store.load(), Err(UpdateError::Persistence(_))));

        std::fs::write(store.path(), "  \n").unwrap();
        assert!(matches!(store.load(), Err(UpdateError::Persistence(_))));
    }

    #[test]
    fn test_save_replaces_whole_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("version.txt");
        std::fs::write(&path, "10.20.30").unwrap();

        let store = FileVersionStore::new(&path);
        store.save("1.1.0").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.1.0");
        assert_eq!(store.load().unwrap(), "1.1.0");
        // Verify temp file was removed
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_failure_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let store = FileVersionStore::new(dir.path().join("missing-dir").join("version.txt"));
        assert!(matches!(store.save("1.0.0"), Err(UpdateError::Persistence(_))));
    }

    #[test]
    fn test_memory_store_history() {
        let store = MemoryVersionStore::new("1.0.0");
        store.save("1.0.1").unwrap();
        store.save("1.1.0").unwrap();
        assert_eq!(store.load().unwrap(), "1.1.0");
        assert_eq!(store.history(), ["1.0.1", "1.1.0"]);
    }
}
