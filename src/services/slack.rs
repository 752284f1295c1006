// src/services/slack.rs
//! Slack incoming-webhook delivery

use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::common::MonitorError;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Result of one delivery attempt. Delivery problems never propagate as
/// errors; the caller only gets to know what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, Clone)]
pub struct SlackService {
    client: Client,
    webhook_url: Option<String>,
}

impl SlackService {
    pub fn new(client: Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    /// Post `message` as `{"text": message}` to the webhook.
    pub async fn send(&self, message: &str) -> DeliveryStatus {
        let Some(url) = self.webhook_url.as_deref() else {
            warn!("SLACK_WEBHOOK_URL not set. Skipping Slack notification.");
            return DeliveryStatus::Skipped;
        };

        match self.post(url, message).await {
            Ok(()) => {
                info!("Slack notification sent");
                DeliveryStatus::Sent
            }
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Error sending Slack message");
                DeliveryStatus::Failed
            }
        }
    }

    async fn post(&self, url: &str, message: &str) -> Result<(), MonitorError> {
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { text: message })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MonitorError::from_response(response).await);
        }
        Ok(())
    }
}
