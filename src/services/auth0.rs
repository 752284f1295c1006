// src/services/auth0.rs
//! Auth0 management API: client-credentials token cache and organization
//! listing endpoints

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::common::{Auth0Config, MonitorError};
use crate::organizations::models::{Member, Organization};

/// Fraction of the server-provided lifetime we trust before refreshing
const TOKEN_LIFETIME_FACTOR: f64 = 0.9;
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
/// Upper bound on the lifetime we accept from the token endpoint (30 days)
const MAX_EXPIRES_IN_SECS: i64 = 30 * 24 * 3600;
/// Page size Auth0 applies when the listing call passes no paging parameters
const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Management API token, exchanged with client credentials and reused until
/// shortly before it expires.
///
/// Owned by the poll loop; every call that needs authorization borrows it.
#[derive(Debug)]
pub struct TokenCache {
    client: Client,
    config: Auth0Config,
    cached: Option<CachedToken>,
}

impl TokenCache {
    pub fn new(client: Client, config: Auth0Config) -> Self {
        Self {
            client,
            config,
            cached: None,
        }
    }

    /// Return the cached token while `now < expires_at`, otherwise exchange
    /// client credentials for a new one.
    pub async fn get_token(&mut self) -> Result<String, MonitorError> {
        if let Some(cached) = &self.cached {
            if Utc::now() < cached.expires_at {
                debug!("Using cached management API token");
                return Ok(cached.value.clone());
            }
            debug!("Cached management API token expired");
        }

        // Never hand out a stale token, even if the refresh below fails.
        self.cached = None;

        let token = self.request_token().await.map_err(|e| {
            error!(error = %e, "Error getting Auth0 token");
            e
        })?;

        let expires_at = expiry_from(Utc::now(), token.expires_in);

        info!(expires_at = %expires_at, "Obtained new management API token");
        self.cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    async fn request_token(&self) -> Result<TokenResponse, MonitorError> {
        let missing = |name: &str| MonitorError::NotConfigured(format!("{} is not set", name));

        let base_url = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| missing("AUTH0_DOMAIN"))?;
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| missing("AUTH0_CLIENT_ID"))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or_else(|| missing("AUTH0_CLIENT_SECRET"))?;
        let audience = self
            .config
            .audience
            .as_deref()
            .ok_or_else(|| missing("AUTH0_DOMAIN"))?;

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("audience", audience),
            ("grant_type", "client_credentials"),
        ];

        debug!(client_id = %client_id, "Requesting management API token");

        let response = self
            .client
            .post(format!("{}/oauth/token", base_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| MonitorError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MonitorError::Auth(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| MonitorError::Auth(format!("invalid token response: {}", e)))
    }
}

/// Expiry instant for a token issued at `now` with the given `expires_in`.
/// The lifetime is clamped to `[0, MAX_EXPIRES_IN_SECS]` before the safety
/// factor is applied, so the addition cannot leave chrono's range.
pub(crate) fn expiry_from(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    let lifetime_secs = expires_in
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS)
        .clamp(0, MAX_EXPIRES_IN_SECS);
    if expires_in.map_or(false, |secs| secs > MAX_EXPIRES_IN_SECS) {
        warn!(expires_in = ?expires_in, "Token lifetime exceeds limit, clamping");
    }
    let lifetime_ms = (lifetime_secs as f64 * 1000.0 * TOKEN_LIFETIME_FACTOR) as i64;
    now.checked_add_signed(Duration::milliseconds(lifetime_ms))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Read-only calls against the organization endpoints
#[derive(Debug, Clone)]
pub struct Auth0Service {
    client: Client,
    base_url: Option<String>,
}

impl Auth0Service {
    pub fn new(client: Client, config: &Auth0Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn base_url(&self) -> Result<&str, MonitorError> {
        self.base_url
            .as_deref()
            .ok_or_else(|| MonitorError::NotConfigured("AUTH0_DOMAIN is not set".to_string()))
    }

    /// List organizations, newest first.
    pub async fn list_organizations(&self, token: &str) -> Result<Vec<Organization>, MonitorError> {
        let response = self
            .client
            .get(format!("{}/api/v2/organizations", self.base_url()?))
            .query(&[("sort", "created_at:-1")])
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = MonitorError::from_response(response).await;
            error!(error = %err, "Organization listing failed");
            return Err(err);
        }

        let orgs: Vec<Organization> = response.json().await?;
        debug!(count = orgs.len(), "Organizations listed");

        // TODO: page through the listing once it is confirmed the tenant can
        // exceed one page; until then the snapshot only covers the first page.
        if orgs.len() == DEFAULT_PAGE_SIZE {
            warn!(
                count = orgs.len(),
                "Organization listing filled a whole page; organizations beyond it are not observed"
            );
        }

        Ok(orgs)
    }

    /// List the members of one organization.
    pub async fn list_members(&self, org_id: &str, token: &str) -> Result<Vec<Member>, MonitorError> {
        let url = format!(
            "{}/api/v2/organizations/{}/members",
            self.base_url()?,
            urlencoding::encode(org_id)
        );

        let response = self.client.get(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            return Err(MonitorError::from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
