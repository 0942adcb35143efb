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

//! Autoupdate - Entry point for the update client binary

use anyhow::Context;
use autoupdate_client::config::DEFAULT_CONFIG_PATH;
use autoupdate_client::{
    ClientConfig, FileVersionStore, HttpFetcher, InstanceLock, Orchestrator, UpdateError,
    UpdateOutcome, UpdatePlan, build_client, fetch_catalog, load_config,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autoupdate")]
#[command(about = "Apply pending versions from a manifest server", long_about = None)]
struct Cli {
    /// Path to the JSON config file (defaults are used if it doesn't exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Catalog endpoint, e.g. http://host:9527/version
    #[arg(long)]
    manifest_url: Option<String>,

    /// Directory archives are extracted into
    #[arg(long)]
    install_root: Option<PathBuf>,

    /// File holding the installed version
    #[arg(long)]
    version_file: Option<PathBuf>,

    /// Directory downloaded archives are staged in
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Maximum number of files fetched and extracted at once
    #[arg(long)]
    max_concurrent_files: Option<usize>,

    /// Only report pending versions, don't apply anything
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.manifest_url {
            config.manifest_url.clone_from(url);
        }
        if let Some(root) = &self.install_root {
            config.install_root.clone_from(root);
        }
        if let Some(file) = &self.version_file {
            config.version_file.clone_from(file);
        }
        if let Some(dir) = &self.staging_dir {
            config.staging_dir.clone_from(dir);
        }
        if self.max_concurrent_files.is_some() {
            config.max_concurrent_files = self.max_concurrent_files;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autoupdate_client=info")),
        )
        .init();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    info!(
        "Loaded config: manifest_url={}, install_root={}",
        config.manifest_url,
        config.install_root.display()
    );

    let _lock = InstanceLock::acquire(&config.staging_dir)?;

    let client = build_client(config.request_timeout())?;
    let catalog = fetch_catalog(&client, &config.manifest_url).await?;

    let orchestrator = Orchestrator::new(
        config.clone(),
        Arc::new(HttpFetcher::with_client(client)),
        Box::new(FileVersionStore::new(&config.version_file)),
    );

    if cli.check {
        let (installed, plan) = orchestrator.check(&catalog)?;
        if plan == UpdatePlan::UpToDate {
            println!("{installed} is up to date");
        } else {
            println!("Installed: {installed}");
            for entry in plan.pending() {
                println!("  {} ({} files)", entry.number, entry.files.len());
            }
        }
        return Ok(());
    }

    match orchestrator.run(catalog).await {
        Ok(UpdateOutcome::AlreadyUpToDate { version }) => {
            info!("Already on latest version: {version}");
            Ok(())
        }
        Ok(UpdateOutcome::Updated { from, to, applied }) => {
            info!("Updated {from} -> {to} ({} versions applied)", applied.len());
            Ok(())
        }
        Err(e) => {
            report_failure(&e);
            Err(e.into())
        }
    }
}

fn report_failure(err: &UpdateError) {
    match err {
        UpdateError::FileFetch { version, .. } | UpdateError::ArchiveExtract { version, .. } => {
            error!(
                version = %version,
                file = err.failed_file().unwrap_or_default(),
                "Update stopped: {err}"
            );
            error!("Fix the problem and run again to resume from this version");
        }
        UpdateError::UnknownInstalledVersion { installed } => {
            error!("Installed version {installed} is not in the catalog, nothing was changed");
        }
        UpdateError::Config(_)
        | UpdateError::CatalogFetch(_)
        | UpdateError::InvalidCatalog(_)
        | UpdateError::Persistence(_)
        | UpdateError::AlreadyRunning(_)
        | UpdateError::Task(_)
        | UpdateError::Io(_) => error!("Update failed: {err}"),
    }
}
