// src/services/github.rs
//! Public GitHub user lookups used to link member profiles

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::common::MonitorError;
use crate::organizations::models::GitHubUser;

#[derive(Debug, Clone)]
pub struct GitHubService {
    client: Client,
    api_url: String,
}

impl GitHubService {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Profile page for the numeric GitHub account id.
    ///
    /// `Ok(None)` when GitHub answers with anything but 200 or the user has no
    /// `html_url`; `Err` only for transport or decoding failures.
    pub async fn profile_url(&self, github_id: &str) -> Result<Option<String>, MonitorError> {
        let response = self
            .client
            .get(format!(
                "{}/user/{}",
                self.api_url,
                urlencoding::encode(github_id)
            ))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            debug!(github_id = %github_id, status = %response.status(), "GitHub user lookup returned no profile");
            return Ok(None);
        }

        let user: GitHubUser = response.json().await?;
        Ok(user.html_url)
    }
}
