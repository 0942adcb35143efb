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

//! Error types for the update client

use autoupdate_shared::CatalogError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("config error: {0}")]
    Config(String),

    #[error("catalog fetch failed: {0}")]
    CatalogFetch(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),

    #[error("installed version {installed} is not in the catalog, install the latest release manually")]
    UnknownInstalledVersion { installed: String },

    #[error("download of {file} failed (version {version}): {reason}")]
    FileFetch {
        version: String,
        file: String,
        reason: String,
    },

    #[error("extraction of {file} failed (version {version}): {reason}")]
    ArchiveExtract {
        version: String,
        file: String,
        reason: String,
    },

    #[error("version state error: {0}")]
    Persistence(String),

    #[error("another update is already running (lock held on {})", .0.display())]
    AlreadyRunning(PathBuf),

    #[error("worker task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl UpdateError {
    pub(crate) fn fetch(file: &str, reason: impl Into<String>) -> Self {
        Self::FileFetch {
            version: String::new(),
            file: file.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn extract(file: &str, reason: impl Into<String>) -> Self {
        Self::ArchiveExtract {
            version: String::new(),
            file: file.to_owned(),
            reason: reason.into(),
        }
    }

    /// Attach the version being applied to a per-file error.
    #[must_use]
    pub fn in_version(self, number: &str) -> Self {
        match self {
            Self::FileFetch { file, reason, .. } => Self::FileFetch {
                version: number.to_owned(),
                file,
                reason,
            },
            Self::ArchiveExtract { file, reason, .. } => Self::ArchiveExtract {
                version: number.to_owned(),
                file,
                reason,
            },
            other => other,
        }
    }

    /// File that caused a per-file failure, if any.
    #[must_use]
    pub fn failed_file(&self) -> Option<&str> {
        if let Self::FileFetch { file, .. } | Self::ArchiveExtract { file, .. } = self {
            Some(file.as_str())
        } else {
            None
        }
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;
