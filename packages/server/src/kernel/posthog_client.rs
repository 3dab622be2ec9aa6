//! PostHog analytics client (server-side capture API).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::common::ProfileId;
use crate::kernel::BaseAnalytics;

/// distinct_id used when an event has no profile to attribute it to
const SERVER_DISTINCT_ID: &str = "server";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PostHogClient {
    client: Client,
    api_key: String,
    host: String,
}

#[derive(Debug, Serialize)]
struct CapturePayload<'a> {
    api_key: &'a str,
    event: &'a str,
    distinct_id: String,
    properties: Value,
    timestamp: String,
}

impl PostHogClient {
    pub fn new(api_key: String, host: String) -> Result<Self> {
        Self::with_timeout(api_key, host, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(api_key: String, host: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create PostHog HTTP client")?;

        Ok(Self {
            client,
            api_key,
            host: host.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BaseAnalytics for PostHogClient {
    async fn track(
        &self,
        event: &str,
        properties: Value,
        profile_id: Option<ProfileId>,
    ) -> Result<()> {
        let payload = CapturePayload {
            api_key: &self.api_key,
            event,
            distinct_id: profile_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| SERVER_DISTINCT_ID.to_string()),
            properties,
            timestamp: Utc::now().to_rfc3339(),
        };

        let response = self
            .client
            .post(format!("{}/capture/", self.host))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("PostHog capture failed {}: {}", status, body);
        }

        debug!(event, "Tracked analytics event");
        Ok(())
    }
}

/// Analytics sink used when no PostHog key is configured
pub struct NoopAnalytics;

#[async_trait]
impl BaseAnalytics for NoopAnalytics {
    async fn track(&self, event: &str, _properties: Value, _profile_id: Option<ProfileId>) -> Result<()> {
        debug!(event, "Analytics disabled, dropping event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_track_posts_capture_payload() {
        let server = MockServer::start().await;
        let profile_id = ProfileId::new();

        Mock::given(method("POST"))
            .and(path("/capture/"))
            .and(body_partial_json(serde_json::json!({
                "api_key": "phc_test",
                "event": "recipe_favorited",
                "distinct_id": profile_id.to_string(),
                "properties": {"recipeId": "r1"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = PostHogClient::new("phc_test".to_string(), format!("{}/", server.uri())).unwrap();
        client
            .track(
                "recipe_favorited",
                serde_json::json!({"recipeId": "r1"}),
                Some(profile_id),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_track_without_profile_uses_server_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"distinct_id": "server"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = PostHogClient::new("phc_test".to_string(), server.uri()).unwrap();
        client
            .track("user_registered", Value::Null, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_track_reports_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = PostHogClient::new("phc_test".to_string(), server.uri()).unwrap();
        assert!(client.track("x", Value::Null, None).await.is_err());
    }

    #[tokio::test]
    async fn test_stalled_capture_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(30)))
            .mount(&server)
            .await;

        let client = PostHogClient::with_timeout(
            "phc_test".to_string(),
            server.uri(),
            Duration::from_millis(200),
        )
        .unwrap();

        let started = std::time::Instant::now();
        assert!(client.track("recipe_cooked", Value::Null, None).await.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
