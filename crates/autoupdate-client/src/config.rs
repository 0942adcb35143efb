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

//! Configuration module for the update client

use crate::error::{Result, UpdateError};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_CONFIG_PATH: &str = "autoupdate.json";

fn default_manifest_url() -> String {
    "http://127.0.0.1:9527/version".to_owned()
}

fn default_version_file() -> PathBuf {
    PathBuf::from("version.txt")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("updates")
}

fn default_install_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_300() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint serving the version catalog
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,

    /// Plain-text file holding the installed version
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    /// Where downloaded archives are kept before extraction
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Directory archives are extracted into
    #[serde(default = "default_install_root")]
    pub install_root: PathBuf,

    /// Cap on files fetched and extracted at once (unbounded if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_files: Option<usize>,

    /// Per-request timeout for catalog and archive downloads (seconds)
    #[serde(default = "default_300")]
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            manifest_url: default_manifest_url(),
            version_file: default_version_file(),
            staging_dir: default_staging_dir(),
            install_root: default_install_root(),
            max_concurrent_files: None,
            request_timeout_secs: default_300(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Staging path for a catalog file name.
    ///
    /// Only plain file names are accepted, anything with a directory part could
    /// land outside the staging directory.
    pub fn staged_path(&self, name: &str) -> Result<PathBuf> {
        match Path::new(name).file_name() {
            Some(file_name) if file_name == OsStr::new(name) => Ok(self.staging_dir.join(name)),
            _ => Err(UpdateError::Config(format!(
                "invalid file name in catalog: {name:?}"
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.manifest_url.is_empty() {
            return Err(UpdateError::Config("manifest_url must be set".to_owned()));
        }
        if let Some(limit) = self.max_concurrent_files
            && !(1..=Semaphore::MAX_PERMITS).contains(&limit)
        {
            return Err(UpdateError::Config(format!(
                "max_concurrent_files must be between 1 and {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

/// Load the client config, falling back to defaults if the file does not exist
pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| UpdateError::Config(format!("Failed to parse config: {e}")))?
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        ClientConfig::default()
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.manifest_url, "http://127.0.0.1:9527/version");
        assert_eq!(config.version_file, PathBuf::from("version.txt"));
        assert_eq!(config.staging_dir, PathBuf::from("updates"));
        assert_eq!(config.install_root, PathBuf::from("."));
        assert!(config.max_concurrent_files.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autoupdate.json");
        std::fs::write(
            &path,
            r#"{"manifest_url": "http://updates.local/version", "max_concurrent_files": 4}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.manifest_url, "http://updates.local/version");
        assert_eq!(config.max_concurrent_files, Some(4));
        assert_eq!(config.staging_dir, PathBuf::from("updates"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autoupdate.json");

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config(&path), Err(UpdateError::Config(_))));

        std::fs::write(&path, r#"{"max_concurrent_files": 0}"#).unwrap();
        assert!(matches!(load_config(&path), Err(UpdateError::Config(_))));

        std::fs::write(&path, format!(r#"{{"max_concurrent_files": {}}}"#, usize::MAX)).unwrap();
        assert!(matches!(load_config(&path), Err(UpdateError::Config(_))));
    }

    #[test]
    fn test_concurrency_limit_bounds() {
        let mut config = ClientConfig {
            max_concurrent_files: Some(Semaphore::MAX_PERMITS),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.max_concurrent_files = Some(Semaphore::MAX_PERMITS + 1);
        assert!(matches!(config.validate(), Err(UpdateError::Config(_))));

        config.max_concurrent_files = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_staged_path_requires_plain_names() {
        let config = ClientConfig::default();
        assert_eq!(
            config.staged_path("a.zip").unwrap(),
            PathBuf::from("updates/a.zip")
        );
        assert!(config.staged_path("../../etc/b.zip").is_err());
        assert!(config.staged_path("sub/b.zip").is_err());
        assert!(config.staged_path("..").is_err());
        assert!(config.staged_path("").is_err());
    }
}
