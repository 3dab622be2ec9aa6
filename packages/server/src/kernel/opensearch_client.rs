//! OpenSearch REST client (index bootstrap + `_bulk` writes).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::kernel::{BaseSearchIndex, BulkItemFailure, BulkOperation, BulkOutcome};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenSearchClient {
    client: Client,
    base_url: String,
    index: String,
    credentials: Option<(String, Option<String>)>,
    mappings: Value,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, BulkItemResponse>>,
}

#[derive(Debug, Deserialize)]
struct BulkItemResponse {
    #[serde(rename = "_id")]
    id: String,
    status: u16,
    error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
struct BulkItemError {
    #[serde(rename = "type")]
    kind: String,
    reason: Option<String>,
}

impl OpenSearchClient {
    /// `mappings` is the body of the index-creation request (settings + mappings)
    pub fn new(
        base_url: &str,
        index: &str,
        username: Option<String>,
        password: Option<String>,
        mappings: Value,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create OpenSearch HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            credentials: username.map(|user| (user, password)),
            mappings,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_ref()),
            None => builder,
        }
    }

    /// Serialise operations into the NDJSON `_bulk` body
    fn bulk_body(&self, operations: &[BulkOperation]) -> Result<String> {
        let mut body = String::new();
        for op in operations {
            match op {
                BulkOperation::Index { id, document } => {
                    body.push_str(&serde_json::to_string(
                        &json!({ "index": { "_index": self.index, "_id": id } }),
                    )?);
                    body.push('\n');
                    body.push_str(&serde_json::to_string(document)?);
                    body.push('\n');
                }
                BulkOperation::Delete { id } => {
                    body.push_str(&serde_json::to_string(
                        &json!({ "delete": { "_index": self.index, "_id": id } }),
                    )?);
                    body.push('\n');
                }
            }
        }
        Ok(body)
    }
}

#[async_trait]
impl BaseSearchIndex for OpenSearchClient {
    async fn ping(&self) -> Result<()> {
        let response = self
            .request(reqwest::Method::HEAD, "")
            .send()
            .await
            .context("Failed to reach OpenSearch")?;

        if !response.status().is_success() {
            anyhow::bail!("OpenSearch answered {}", response.status());
        }
        Ok(())
    }

    async fn ensure_index(&self) -> Result<()> {
        let exists = self
            .request(reqwest::Method::HEAD, &self.index)
            .send()
            .await
            .context("Failed to reach OpenSearch")?;

        if exists.status().is_success() {
            debug!(index = %self.index, "Search index already exists");
            return Ok(());
        }
        if exists.status() != StatusCode::NOT_FOUND {
            anyhow::bail!("Unexpected status {} checking index {}", exists.status(), self.index);
        }

        let response = self
            .request(reqwest::Method::PUT, &self.index)
            .json(&self.mappings)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Creating index {} failed {}: {}", self.index, status, body);
        }

        info!(index = %self.index, "Created search index");
        Ok(())
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> Result<BulkOutcome> {
        if operations.is_empty() {
            return Ok(BulkOutcome::default());
        }

        let response = self
            .request(reqwest::Method::POST, "_bulk")
            .header("Content-Type", "application/x-ndjson")
            .body(self.bulk_body(operations)?)
            .send()
            .await
            .context("Bulk request to OpenSearch failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenSearch bulk error {}: {}", status, body);
        }

        let parsed: BulkResponse = response
            .json()
            .await
            .context("Invalid bulk response from OpenSearch")?;

        let mut outcome = BulkOutcome::default();
        for (action, item) in parsed.items.into_iter().flat_map(|m| m.into_iter()) {
            // Deleting a document that was never indexed is fine
            let missing_delete = action == "delete" && item.status == 404;
            match item.error {
                Some(error) if !missing_delete => outcome.failures.push(BulkItemFailure {
                    id: item.id,
                    status: item.status,
                    reason: error
                        .reason
                        .map(|r| format!("{}: {}", error.kind, r))
                        .unwrap_or(error.kind),
                }),
                _ => outcome.succeeded += 1,
            }
        }

        if parsed.errors && outcome.failures.is_empty() {
            debug!("Bulk response flagged errors but all items resolved");
        }

        Ok(outcome)
    }
}
