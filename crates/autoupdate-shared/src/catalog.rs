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

//! Update manifest served at `/version`.
//!
//! Keys are camelCase on the wire. The PascalCase aliases keep older manifest
//! servers readable, the snake_case ones let the same struct live in a TOML config.

use crate::version::{Version, VersionError, parse_version};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("version {number} is listed more than once (as {first:?} and {second:?})")]
    Duplicate {
        number: Version,
        first: String,
        second: String,
    },

    #[error("version {version} lists file {name:?} more than once")]
    DuplicateFile { version: String, name: String },
}

/// Published description of all reachable versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCatalog {
    /// Newest version as announced by the publisher (informational only)
    #[serde(default, alias = "LastVersion", alias = "latest_version")]
    pub latest_version: String,

    /// Version records in publication order, not necessarily sorted
    #[serde(default, alias = "Version", deserialize_with = "null_as_empty")]
    pub versions: Vec<VersionEntry>,
}

/// One reachable version and the archives that bring the previous one up to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    #[serde(alias = "Number")]
    pub number: String,

    #[serde(default, alias = "Notes")]
    pub notes: String,

    #[serde(default, alias = "Files", deserialize_with = "null_as_empty")]
    pub files: Vec<FileRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Staging file name, also the archive path handed to the installer
    #[serde(alias = "Name")]
    pub name: String,

    #[serde(alias = "URL", alias = "Url")]
    pub url: String,
}

// Older publishers encode an empty list as null
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl VersionCatalog {
    #[must_use]
    pub fn find(&self, number: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.number == number)
    }

    #[must_use]
    pub fn contains(&self, number: &str) -> bool {
        self.find(number).is_some()
    }

    /// Entries in ascending version order.
    ///
    /// Fails if any number is malformed or two entries denote the same version,
    /// since either would leave the application order undefined.
    pub fn sorted(&self) -> Result<Vec<&VersionEntry>, CatalogError> {
        let mut keyed = Vec::with_capacity(self.versions.len());
        let mut seen: HashMap<Version, &str> = HashMap::with_capacity(self.versions.len());

        for entry in &self.versions {
            let version = parse_version(&entry.number)?;
            if let Some(first) = seen.insert(version, entry.number.as_str()) {
                return Err(CatalogError::Duplicate {
                    number: version,
                    first: first.to_owned(),
                    second: entry.number.clone(),
                });
            }
            keyed.push((version, entry));
        }

        keyed.sort_by_key(|(version, _)| *version);
        Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Check that every entry has a well-formed, unique version number and
    /// that no version stages two files under the same name.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.sorted()?;

        for entry in &self.versions {
            let mut names = HashSet::with_capacity(entry.files.len());
            for file in &entry.files {
                if !names.insert(file.name.as_str()) {
                    return Err(CatalogError::DuplicateFile {
                        version: entry.number.clone(),
                        name: file.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Highest version listed, by version order rather than by `latest_version`.
    pub fn newest(&self) -> Result<Option<&VersionEntry>, CatalogError> {
        Ok(self.sorted()?.pop())
    }
}
