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

//! Types shared between the AutoUpdate client and the manifest server.
//!
//! The server publishes a [`VersionCatalog`] as JSON, the client consumes it and
//! orders its entries with [`compare_versions`].

pub mod catalog;
pub mod version;

pub use catalog::{CatalogError, FileRef, VersionCatalog, VersionEntry};
pub use version::{Version, VersionError, compare_versions, parse_version};
