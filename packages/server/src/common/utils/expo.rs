use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::kernel::{BasePushNotificationService, PushMessage};

const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Expo has a hard limit of 100 messages per push request
const EXPO_BATCH_LIMIT: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Expo Push Notification Client
///
/// Delivers notification rows to the mobile app. Tickets with status "error"
/// are logged; the caller treats push as best-effort.
pub struct ExpoClient {
    client: Client,
    access_token: Option<String>,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ExpoMessage<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    data: &'a serde_json::Value,
    sound: &'static str,
}

#[derive(Debug, Deserialize)]
struct ExpoResponse {
    data: Vec<ExpoTicket>,
}

#[derive(Debug, Deserialize)]
struct ExpoTicket {
    status: String,
    message: Option<String>,
}

impl ExpoClient {
    pub fn new(access_token: Option<String>) -> Result<Self> {
        Self::with_endpoint(access_token, EXPO_PUSH_URL)
    }

    /// Point the client at a different push endpoint (tests, self-hosted relay)
    pub fn with_endpoint(access_token: Option<String>, endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(access_token, endpoint, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        access_token: Option<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create Expo HTTP client")?;

        Ok(Self {
            client,
            access_token,
            endpoint: endpoint.into(),
        })
    }

    async fn post_chunk(&self, messages: &[ExpoMessage<'_>]) -> Result<usize> {
        let mut request = self.client.post(&self.endpoint).json(messages);

        // Access token raises Expo's rate limits
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!(%status, body = %body, "Expo push request failed");
            anyhow::bail!("Expo push API error {}: {}", status, body);
        }

        let expo_response: ExpoResponse = response.json().await?;

        let mut failed = 0;
        for ticket in &expo_response.data {
            if ticket.status == "error" {
                warn!(message = ?ticket.message, "Expo ticket error");
                failed += 1;
            }
        }

        Ok(failed)
    }
}

#[async_trait]
impl BasePushNotificationService for ExpoClient {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let expo_messages: Vec<ExpoMessage<'_>> = messages
            .iter()
            .map(|m| ExpoMessage {
                to: &m.push_token,
                title: &m.title,
                body: &m.body,
                data: &m.data,
                sound: "default",
            })
            .collect();

        let mut failed = 0;
        for chunk in expo_messages.chunks(EXPO_BATCH_LIMIT) {
            failed += self.post_chunk(chunk).await?;
        }

        if failed > 0 {
            warn!(failed, total = messages.len(), "Some push notifications failed");
        } else {
            debug!(total = messages.len(), "Push notifications sent");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message(token: &str) -> PushMessage {
        PushMessage {
            push_token: token.to_string(),
            title: "Neues Like".to_string(),
            body: "Anna hat dein Rezept favorisiert".to_string(),
            data: serde_json::json!({"notificationId": "n1"}),
        }
    }

    #[tokio::test]
    async fn test_send_batch_posts_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/push"))
            .and(header("Authorization", "Bearer expo-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"status": "ok", "id": "t1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ExpoClient::with_endpoint(
            Some("expo-secret".to_string()),
            format!("{}/push", server.uri()),
        )
        .unwrap();
        client
            .send_batch(&[message("ExponentPushToken[abc]")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ticket_errors_do_not_fail_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"status": "error", "message": "DeviceNotRegistered"}]
            })))
            .mount(&server)
            .await;

        let client = ExpoClient::with_endpoint(None, server.uri()).unwrap();
        assert!(client.send_batch(&[message("ExponentPushToken[x]")]).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_error_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = ExpoClient::with_endpoint(None, server.uri()).unwrap();
        assert!(client.send_batch(&[message("ExponentPushToken[x]")]).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let client = ExpoClient::with_endpoint(None, "http://127.0.0.1:9").unwrap();
        assert!(client.send_batch(&[]).await.is_ok());
    }
}
