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

use std::sync::Arc;

use autoupdate_shared::VersionCatalog;
use parking_lot::RwLock;

/// Catalog currently being served, shared between the router and the reloader
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<VersionCatalog>>,
}

impl CatalogStore {
    pub fn new(catalog: VersionCatalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> VersionCatalog {
        self.inner.read().clone()
    }

    pub fn replace(&self, catalog: VersionCatalog) {
        *self.inner.write() = catalog;
    }
}
