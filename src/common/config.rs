// src/common/config.rs
//! Runtime configuration read from the environment (after `.env` is loaded)

#[cfg(test)]
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 5 * 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SNAPSHOT_FILE: &str = "previous_orgs.json";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SENTRY_ENVIRONMENT: &str = "production";

/// Identity provider (Auth0 management API) settings.
///
/// Every field is optional at load time; a missing domain or credential makes
/// each poll cycle fail at the token exchange instead of aborting startup.
#[derive(Debug, Clone, Default)]
pub struct Auth0Config {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Base URL for all provider calls, `https://{domain}` unless overridden
    pub base_url: Option<String>,
    /// Token audience, `https://{domain}/api/v2/` unless overridden
    pub audience: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth0: Auth0Config,
    pub slack_webhook_url: Option<String>,
    pub github_api_url: String,
    pub snapshot_path: PathBuf,
    pub poll_interval: Duration,
    pub retry_interval: Duration,
    pub http_timeout: Duration,
    pub port: u16,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let domain = get("AUTH0_DOMAIN").map(|d| d.trim_end_matches('/').to_string());
        let base_url = get("AUTH0_BASE_URL")
            .or_else(|| domain.as_ref().map(|d| format!("https://{}", d)))
            .map(|u| u.trim_end_matches('/').to_string());
        let audience = get("AUTH0_AUDIENCE")
            .or_else(|| domain.as_ref().map(|d| format!("https://{}/api/v2/", d)));

        let auth0 = Auth0Config {
            domain,
            client_id: get("AUTH0_CLIENT_ID"),
            client_secret: get("AUTH0_CLIENT_SECRET"),
            base_url,
            audience,
        };

        let github_api_url = get("GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            auth0,
            slack_webhook_url: get("SLACK_WEBHOOK_URL"),
            github_api_url,
            snapshot_path: PathBuf::from(
                get("PREVIOUS_ORGS_FILE").unwrap_or_else(|| DEFAULT_SNAPSHOT_FILE.to_string()),
            ),
            poll_interval: Duration::from_secs(parse_or(
                "POLL_INTERVAL_SECS",
                get("POLL_INTERVAL_SECS"),
                DEFAULT_POLL_INTERVAL_SECS,
            )),
            retry_interval: Duration::from_secs(parse_or(
                "RETRY_INTERVAL_SECS",
                get("RETRY_INTERVAL_SECS"),
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                get("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT),
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_SENTRY_ENVIRONMENT.to_string()),
        }
    }

    #[cfg(test)]
    pub fn from_map(vars: &HashMap<&str, &str>) -> Self {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(key = %key, value = %value, default = %default, "Unparseable value, using default");
            default
        }),
        None => default,
    }
}

/// Log the effective configuration on startup. Secrets are reported only as
/// present or missing.
pub fn log_config_summary(config: &AppConfig) {
    let presence = |v: &Option<String>| if v.is_some() { "set" } else { "missing" };

    info!(
        domain = config.auth0.domain.as_deref().unwrap_or("<missing>"),
        client_id = presence(&config.auth0.client_id),
        client_secret = presence(&config.auth0.client_secret),
        "Identity provider configuration"
    );
    info!(
        snapshot = %config.snapshot_path.display(),
        poll_interval_secs = config.poll_interval.as_secs(),
        retry_interval_secs = config.retry_interval.as_secs(),
        github_api = %config.github_api_url,
        "Polling configuration"
    );
    info!(
        sentry_dsn = presence(&config.sentry_dsn),
        sentry_environment = %config.sentry_environment,
        "Error reporting configuration"
    );

    if config.auth0.domain.is_none()
        || config.auth0.client_id.is_none()
        || config.auth0.client_secret.is_none()
    {
        warn!("AUTH0_DOMAIN, AUTH0_CLIENT_ID or AUTH0_CLIENT_SECRET missing; every poll cycle will fail until they are set");
    }
    if config.slack_webhook_url.is_none() {
        warn!("SLACK_WEBHOOK_URL not set; notifications will only be logged");
    }
}
