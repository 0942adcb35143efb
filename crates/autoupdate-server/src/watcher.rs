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

//! Hot reload of the catalog when the config file changes on disk

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::store::CatalogStore;

/// Editors often emit several events per save
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Keeps the file watch alive. Dropping it stops reloading.
#[derive(Debug)]
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Watch `path` and swap every valid new catalog into `store`.
///
/// Invalid edits are logged and ignored; the previous catalog stays live.
pub fn spawn_config_watcher(path: &Path, store: CatalogStore) -> Result<ConfigWatcher> {
    let file_name: OsString = path
        .file_name()
        .with_context(|| format!("Config path {} has no file name", path.display()))?
        .to_owned();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            let touches_config = event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(file_name.as_os_str()));
            if touches_config && is_content_change(&event.kind) {
                let _ = tx.send(());
            }
        }
        Err(e) => warn!("Config watch error: {e}"),
    })
    .context("Failed to create config watcher")?;

    // Watch the directory so rename-on-save is still seen
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;
    info!(path = %path.display(), "Watching config for changes");

    let path = path.to_path_buf();
    let task = tokio::spawn(async move {
        while rx.recv().await.is_some() {
            tokio::time::sleep(SETTLE_DELAY).await;
            while rx.try_recv().is_ok() {}

            if let Err(e) = reload(&path, &store) {
                warn!("Config reload failed, keeping previous catalog: {e:#}");
            }
        }
        debug!("Config watcher stopped");
    });

    Ok(ConfigWatcher {
        _watcher: watcher,
        task,
    })
}

/// Re-read the config file and publish its catalog
pub fn reload(path: &Path, store: &CatalogStore) -> Result<()> {
    let config = ServerConfig::from_file(path)?;
    let newest = config.catalog.newest()?.map(|entry| entry.number.clone());
    info!(
        latest = %config.catalog.latest_version,
        newest = newest.as_deref().unwrap_or("none"),
        versions = config.catalog.versions.len(),
        "Catalog reloaded"
    );
    store.replace(config.catalog);
    Ok(())
}

fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => true,
        EventKind::Any | EventKind::Access(_) | EventKind::Other => false,
    }
}
