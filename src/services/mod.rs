// src/services/mod.rs
//
// Clients for the external services the monitor talks to

pub mod auth0;
pub mod github;
pub mod monitoring;
pub mod slack;


// Re-export commonly used types for convenience
pub use auth0::{Auth0Service, TokenCache};
pub use github::GitHubService;
pub use slack::{DeliveryStatus, SlackService};

use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client for every outbound call. GitHub rejects requests
/// without a `User-Agent`.
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
