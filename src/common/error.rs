// Error types for the organization monitor

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the monitor's clients and storage.
///
/// Cycle-level operations (token exchange, organization listing, snapshot
/// load/save) propagate these to the poll loop, which abandons the cycle and
/// retries later. Per-item operations (profile lookup, webhook delivery) log
/// them and carry on.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Token exchange failed: {0}")]
    Auth(String),

    #[error("API returned HTTP {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl MonitorError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            MonitorError::NotConfigured(_) | MonitorError::Auth(_) => "auth",
            MonitorError::Api { .. } | MonitorError::Request(_) => "api",
            MonitorError::Storage(_) | MonitorError::Snapshot(_) => "storage",
        }
    }

    /// Builds an `Api` error from a non-success response, consuming its body.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        MonitorError::Api { status, body }
    }
}
