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

//! Unpacks staged zip archives over the installation root

use crate::error::{Result, UpdateError};
use std::fs::{self, File};
use std::path::Path;
use zip::ZipArchive;

/// Extract every entry of `archive` under `root`, overwriting existing files.
///
/// Blocking; run it on `spawn_blocking` from async code. Returns the number of
/// entries written. The first failing entry aborts the whole archive.
pub fn install_archive(archive: &Path, root: &Path) -> Result<usize> {
    let label = archive
        .file_name()
        .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
    let fail = |reason: String| UpdateError::extract(&label, reason);

    let file = File::open(archive)
        .map_err(|e| fail(format!("Failed to open {}: {e}", archive.display())))?;
    let mut zip = ZipArchive::new(file).map_err(|e| fail(format!("Not a valid archive: {e}")))?;

    fs::create_dir_all(root)
        .map_err(|e| fail(format!("Failed to create {}: {e}", root.display())))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| fail(format!("Failed to read entry {index}: {e}")))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(fail(format!(
                "Entry {:?} points outside the installation root",
                entry.name()
            )));
        };
        let out_path = root.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .map_err(|e| fail(format!("Failed to create {}: {e}", out_path.display())))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| fail(format!("Failed to create {}: {e}", parent.display())))?;
        }

        let mut out = File::create(&out_path)
            .map_err(|e| fail(format!("Failed to create {}: {e}", out_path.display())))?;
        std::io::copy(&mut entry, &mut out)
            .map_err(|e| fail(format!("Failed to write {}: {e}", out_path.display())))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| fail(format!("Failed to set mode on {}: {e}", out_path.display())))?;
        }
    }

    tracing::debug!(
        entries = zip.len(),
        "Extracted {} into {}",
        archive.display(),
        root.display()
    );
    Ok(zip.len())
}
