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

//! Manifest retrieval

use crate::error::{Result, UpdateError};
use autoupdate_shared::VersionCatalog;
use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("autoupdate/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by catalog and archive downloads
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| UpdateError::Config(format!("Failed to build HTTP client: {e}")))
}

/// Fetch and parse the version catalog published at `url`
pub async fn fetch_catalog(client: &reqwest::Client, url: &str) -> Result<VersionCatalog> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| UpdateError::CatalogFetch(format!("Request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_owned());
        return Err(UpdateError::CatalogFetch(format!(
            "Manifest server returned {status}: {body}"
        )));
    }

    let catalog: VersionCatalog = response
        .json()
        .await
        .map_err(|e| UpdateError::CatalogFetch(format!("Failed to parse response: {e}")))?;

    tracing::debug!(
        latest = %catalog.latest_version,
        versions = catalog.versions.len(),
        "Catalog fetched"
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    fn client() -> reqwest::Client {
        build_client(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_catalog_success() {
        let mut server = Server::new_async().await;
        let body = json!({
            "latestVersion": "1.1.0",
            "versions": [
                {"number": "1.0.0"},
                {"number": "1.1.0", "notes": "faster", "files": [{"name": "a.zip", "url": "http://x/a.zip"}]}
            ]
        });

        let mock = server
            .mock("GET", "/version")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let catalog = fetch_catalog(&client(), &format!("{}/version", server.url()))
            .await
            .unwrap();
        assert_eq!(catalog.latest_version, "1.1.0");
        assert_eq!(catalog.versions.len(), 2);
        assert_eq!(catalog.versions[1].notes, "faster");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_catalog_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/version")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let result = fetch_catalog(&client(), &format!("{}/version", server.url())).await;
        match result {
            Err(UpdateError::CatalogFetch(msg)) => assert!(msg.contains("503")),
            other => panic!("expected CatalogFetch, got {other:?}"),
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_catalog_malformed_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/version")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"versions\": 42}")
            .create_async()
            .await;

        let result = fetch_catalog(&client(), &format!("{}/version", server.url())).await;
        assert!(matches!(result, Err(UpdateError::CatalogFetch(_))));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_catalog_unreachable() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let result = fetch_catalog(&client(), "http://127.0.0.1:9/version").await;
        assert!(matches!(result, Err(UpdateError::CatalogFetch(_))));
    }
}
