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

//! Decides which catalog versions still have to be applied, and in what order.

use crate::error::{Result, UpdateError};
use autoupdate_shared::{VersionCatalog, VersionEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// Installed version is the newest one in the catalog
    UpToDate,
    /// Versions newer than the installed one, oldest first
    Pending(Vec<VersionEntry>),
}

impl UpdatePlan {
    #[must_use]
    pub fn pending(&self) -> &[VersionEntry] {
        match self {
            Self::UpToDate => &[],
            Self::Pending(versions) => versions,
        }
    }
}

/// Validate `installed` against the catalog and list what comes after it.
///
/// The installed version is the resume point: it is never part of the result.
pub fn plan_updates(installed: &str, catalog: &VersionCatalog) -> Result<UpdatePlan> {
    if !catalog.contains(installed) {
        return Err(UpdateError::UnknownInstalledVersion {
            installed: installed.to_owned(),
        });
    }

    catalog.validate()?;
    let sorted = catalog.sorted()?;

    let pending: Vec<VersionEntry> = sorted
        .iter()
        .skip_while(|entry| entry.number != installed)
        .skip(1)
        .map(|entry| (*entry).clone())
        .collect();

    if !catalog.latest_version.is_empty()
        && let Some(newest) = sorted.last()
        && newest.number != catalog.latest_version
    {
        tracing::warn!(
            announced = %catalog.latest_version,
            newest = %newest.number,
            "Catalog latest version does not match its newest entry"
        );
    }

    if pending.is_empty() {
        Ok(UpdatePlan::UpToDate)
    } else {
        Ok(UpdatePlan::Pending(pending))
    }
}
