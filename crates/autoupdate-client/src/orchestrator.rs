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

//! Main update loop: applies pending versions one after another

use crate::config::ClientConfig;
use crate::error::{Result, UpdateError};
use crate::fetcher::Fetcher;
use crate::installer::install_archive;
use crate::plan::{UpdatePlan, plan_updates};
use crate::state::VersionStore;
use autoupdate_shared::{VersionCatalog, VersionEntry};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    AlreadyUpToDate {
        version: String,
    },
    Updated {
        from: String,
        to: String,
        /// Versions applied in this run, oldest first
        applied: Vec<String>,
    },
}

/// One archive of a version, with its resolved staging path
#[derive(Debug, Clone)]
struct FileJob {
    name: String,
    url: String,
    staged: PathBuf,
}

pub struct Orchestrator {
    config: ClientConfig,
    fetcher: Arc<dyn Fetcher>,
    store: Box<dyn VersionStore>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        config: ClientConfig,
        fetcher: Arc<dyn Fetcher>,
        store: Box<dyn VersionStore>,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    /// Read the installed version and work out what a run would apply
    pub fn check(&self, catalog: &VersionCatalog) -> Result<(String, UpdatePlan)> {
        let installed = self.store.load()?;
        let plan = plan_updates(&installed, catalog)?;
        Ok((installed, plan))
    }

    /// Bring the installation up to the newest catalog version.
    ///
    /// The marker is advanced after each fully applied version. Any failure ends
    /// the run with the marker still on the last complete version, so rerunning
    /// resumes exactly where this run stopped.
    pub async fn run(&self, catalog: VersionCatalog) -> Result<UpdateOutcome> {
        let (installed, plan) = self.check(&catalog)?;
        info!(
            installed = %installed,
            latest = %catalog.latest_version,
            "Checked installed version against catalog"
        );

        let pending = match plan {
            UpdatePlan::UpToDate => {
                info!("Already on latest version: {installed}");
                return Ok(UpdateOutcome::AlreadyUpToDate { version: installed });
            }
            UpdatePlan::Pending(pending) => pending,
        };

        // Resolve every staging path before touching the disk
        let batches = pending
            .into_iter()
            .map(|entry| {
                let jobs = self.jobs_for(&entry)?;
                Ok((entry, jobs))
            })
            .collect::<Result<Vec<_>>>()?;

        tokio::fs::create_dir_all(&self.config.staging_dir).await?;

        let mut applied = Vec::with_capacity(batches.len());
        for (entry, jobs) in batches {
            self.apply_version(&entry, jobs).await?;

            self.store.save(&entry.number)?;
            info!(version = %entry.number, "Version applied and recorded");
            applied.push(entry.number);
        }

        let to = applied.last().cloned().unwrap_or_else(|| installed.clone());
        info!("Update complete: {installed} -> {to}");
        Ok(UpdateOutcome::Updated {
            from: installed,
            to,
            applied,
        })
    }

    fn jobs_for(&self, entry: &VersionEntry) -> Result<Vec<FileJob>> {
        entry
            .files
            .iter()
            .map(|file| {
                Ok(FileJob {
                    name: file.name.clone(),
                    url: file.url.clone(),
                    staged: self.config.staged_path(&file.name)?,
                })
            })
            .collect()
    }

    /// Fetch and extract every file of one version concurrently.
    ///
    /// Returns only after all spawned tasks have finished or been aborted.
    async fn apply_version(&self, entry: &VersionEntry, jobs: Vec<FileJob>) -> Result<()> {
        info!(
            version = %entry.number,
            files = jobs.len(),
            "Found version to apply"
        );
        if !entry.notes.is_empty() {
            info!(version = %entry.number, "Release notes: {}", entry.notes);
        }

        let limit = self
            .config
            .max_concurrent_files
            .map(|permits| Arc::new(Semaphore::new(permits)));
        let total = jobs.len();
        let mut tasks = JoinSet::new();

        for (index, job) in jobs.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let root = self.config.install_root.clone();
            let limit = limit.clone();

            tasks.spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => Some(
                        semaphore
                            .acquire_owned()
                            .await
                            .map_err(|e| UpdateError::Task(e.to_string()))?,
                    ),
                    None => None,
                };
                apply_file(fetcher.as_ref(), &job, &root, index + 1, total).await
            });
        }

        let mut first_error: Option<UpdateError> = None;
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => Err(UpdateError::Task(format!("file worker panicked: {e}"))),
            };

            if let Err(e) = result {
                if first_error.is_none() {
                    warn!(version = %entry.number, "Aborting version: {e}");
                    tasks.abort_all();
                    first_error = Some(e);
                } else {
                    debug!(version = %entry.number, "Additional failure: {e}");
                }
            }
        }

        match first_error {
            Some(e) => Err(e.in_version(&entry.number)),
            None => Ok(()),
        }
    }
}

async fn apply_file(
    fetcher: &dyn Fetcher,
    job: &FileJob,
    root: &Path,
    index: usize,
    total: usize,
) -> Result<()> {
    info!("Updating file {index}/{total}: {}", job.name);
    fetcher.fetch(&job.url, &job.staged).await?;

    debug!("Downloaded {}, extracting", job.name);
    let archive = job.staged.clone();
    let root = root.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || install_archive(&archive, &root))
        .await
        .map_err(|e| UpdateError::extract(&job.name, format!("Extraction task failed: {e}")))??;

    info!("File {index}/{total} updated ({entries} entries)");
    Ok(())
}
