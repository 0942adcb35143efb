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

//! Archive downloader module

use crate::error::{Result, UpdateError};
use async_trait::async_trait;
use std::path::Path;

/// Retrieves one remote artifact into a local file
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` in full and write it to `dest`, replacing any previous content.
    ///
    /// A single attempt: no retry, no resume.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let file = dest
            .file_name()
            .map_or_else(|| dest.display().to_string(), |n| n.to_string_lossy().into_owned());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpdateError::fetch(&file, format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(UpdateError::fetch(
                &file,
                format!("Download failed with status: {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpdateError::fetch(&file, format!("Failed to download bytes: {e}")))?;

        tokio::fs::write(dest, &bytes).await.map_err(|e| {
            UpdateError::fetch(&file, format!("Failed to write {}: {e}", dest.display()))
        })?;

        tracing::debug!(url, bytes = bytes.len(), "Downloaded {}", dest.display());
        Ok(())
    }
}
