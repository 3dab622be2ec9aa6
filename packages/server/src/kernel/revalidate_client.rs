//! Client for the frontend's on-demand revalidation endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::kernel::BaseCacheInvalidator;

/// Header carrying the shared secret the frontend checks
pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RevalidateClient {
    client: Client,
    url: String,
    secret: Option<String>,
}

impl RevalidateClient {
    pub fn new(url: String, secret: Option<String>) -> Result<Self> {
        Self::with_timeout(url, secret, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: String, secret: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create revalidation HTTP client")?;

        Ok(Self { client, url, secret })
    }
}

#[async_trait]
impl BaseCacheInvalidator for RevalidateClient {
    async fn revalidate_path(&self, path: &str) -> Result<()> {
        let mut request = self.client.post(&self.url).json(&json!({ "path": path }));

        if let Some(secret) = &self.secret {
            request = request.header(REVALIDATE_SECRET_HEADER, secret);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Revalidation of {} failed with {}", path, response.status());
        }

        debug!(path, "Path revalidated");
        Ok(())
    }
}

/// Used when no revalidation endpoint is configured
pub struct NoopCacheInvalidator;

#[async_trait]
impl BaseCacheInvalidator for NoopCacheInvalidator {
    async fn revalidate_path(&self, path: &str) -> Result<()> {
        debug!(path, "Revalidation disabled, skipping");
        Ok(())
    }
}
