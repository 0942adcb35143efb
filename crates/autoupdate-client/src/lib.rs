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

//! Autoupdate client - brings an installation up to the newest published version
//!
//! Versions are applied strictly in order. Files within one version are fetched
//! and extracted concurrently, and the installed-version marker only moves once
//! every file of that version has landed.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod installer;
pub mod lock;
pub mod orchestrator;
pub mod plan;
pub mod state;

pub use catalog::{build_client, fetch_catalog};
pub use config::{ClientConfig, load_config};
pub use error::{Result, UpdateError};
pub use fetcher::{Fetcher, HttpFetcher};
pub use lock::InstanceLock;
pub use orchestrator::{Orchestrator, UpdateOutcome};
pub use plan::{UpdatePlan, plan_updates};
pub use state::{FileVersionStore, MemoryVersionStore, VersionStore};
