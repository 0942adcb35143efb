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

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use autoupdate_server::config::{DEFAULT_CONFIG_PATH, ServerConfig};
use autoupdate_server::routes;
use autoupdate_server::store::CatalogStore;
use autoupdate_server::watcher::spawn_config_watcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autoupdate_server=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    info!(path = %config_path.display(), "Loading configuration");
    let config = ServerConfig::from_file(&config_path)?;
    let newest = config.catalog.newest()?.map(|entry| entry.number.clone());
    info!(
        latest = %config.catalog.latest_version,
        newest = newest.as_deref().unwrap_or("none"),
        versions = config.catalog.versions.len(),
        "Catalog loaded"
    );

    let store = CatalogStore::new(config.catalog.clone());
    let _watcher = spawn_config_watcher(&config_path, store.clone())?;

    let app = routes::router(store, &config.server.static_dir);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        static_dir = %config.server.static_dir.display(),
        "Manifest server listening on {addr}"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
