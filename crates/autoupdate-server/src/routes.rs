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

use std::path::Path;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::services::ServeDir;

use autoupdate_shared::VersionCatalog;

use crate::store::CatalogStore;

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn version_handler(State(store): State<CatalogStore>) -> Json<VersionCatalog> {
    Json(store.snapshot())
}

/// `GET /version` serves the catalog, `/static` serves update archives
pub fn router(store: CatalogStore, static_dir: &Path) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .with_state(store)
        .nest_service("/static", ServeDir::new(static_dir))
}
