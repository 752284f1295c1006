// src/poller.rs
//! Poll loop: fetch -> diff -> (enrich -> notify)* -> persist -> sleep

use chrono::Local;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::common::{AppConfig, MonitorError};
use crate::organizations::notifier::TIMESTAMP_FORMAT;
use crate::organizations::{find_new, MemberEnricher, Notifier, SnapshotStore};
use crate::services::{Auth0Service, DeliveryStatus, GitHubService, SlackService, TokenCache};

/// What one successful cycle did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub listed: usize,
    pub new_org_ids: Vec<String>,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CycleReport {
    fn record(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Sent => self.sent += 1,
            DeliveryStatus::Skipped => self.skipped += 1,
            DeliveryStatus::Failed => self.failed += 1,
        }
    }
}

pub struct Poller {
    tokens: TokenCache,
    auth0: Auth0Service,
    enricher: MemberEnricher,
    notifier: Notifier,
    store: SnapshotStore,
    poll_interval: Duration,
    retry_interval: Duration,
}

impl Poller {
    pub fn new(config: &AppConfig, client: Client) -> Self {
        let auth0 = Auth0Service::new(client.clone(), &config.auth0);
        let github = GitHubService::new(client.clone(), config.github_api_url.clone());
        let slack = SlackService::new(client.clone(), config.slack_webhook_url.clone());

        Self {
            tokens: TokenCache::new(client, config.auth0.clone()),
            enricher: MemberEnricher::new(auth0.clone(), github),
            auth0,
            notifier: Notifier::new(slack),
            store: SnapshotStore::new(config.snapshot_path.clone()),
            poll_interval: config.poll_interval,
            retry_interval: config.retry_interval,
        }
    }

    /// Run one full cycle.
    ///
    /// Errors from the token exchange, the listing, or the snapshot abort the
    /// cycle before the snapshot is written, so the same comparison is retried
    /// next time. Enrichment and delivery problems are absorbed.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, MonitorError> {
        // FETCH
        let token = self.tokens.get_token().await?;
        let current = self.auth0.list_organizations(&token).await?;

        // DIFF
        let previous = self.store.load().await?;
        let new_orgs = find_new(&current, &previous);

        let mut report = CycleReport {
            listed: current.len(),
            ..Default::default()
        };

        if new_orgs.is_empty() {
            info!(
                "No new organizations found at {}",
                Local::now().format(TIMESTAMP_FORMAT)
            );
        } else {
            info!(count = new_orgs.len(), "Found {} new organization(s)!", new_orgs.len());
        }

        // ENRICH -> NOTIFY
        for org in &new_orgs {
            let members = match self.tokens.get_token().await {
                Ok(token) => self.enricher.get_members(&org.id, &token).await,
                Err(e) => {
                    warn!(org_id = %org.id, error = %e, "No token for member lookup, notifying without members");
                    Vec::new()
                }
            };

            let status = self.notifier.notify(org, &members).await;
            report.record(status);
            report.new_org_ids.push(org.id.clone());
        }

        // PERSIST
        self.store.save(&current).await?;

        Ok(report)
    }

    /// Sleep that follows a cycle: the short poll interval after success, the
    /// long retry interval after a failure.
    pub fn delay_after(&self, outcome: &Result<CycleReport, MonitorError>) -> Duration {
        match outcome {
            Ok(_) => self.poll_interval,
            Err(_) => self.retry_interval,
        }
    }

    /// Poll until `cancel` fires. A running cycle is always allowed to finish;
    /// cancellation takes effect at the next sleep.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            snapshot = %self.store.path().display(),
            "Starting organization polling system..."
        );
        info!(
            "Checking for new organizations every {} seconds",
            self.poll_interval.as_secs()
        );

        loop {
            let outcome = self.run_cycle().await;

            match &outcome {
                Ok(report) => info!(
                    listed = report.listed,
                    new = report.new_org_ids.len(),
                    sent = report.sent,
                    skipped = report.skipped,
                    failed = report.failed,
                    "Poll cycle complete"
                ),
                Err(e) => error!(error = %e, kind = e.kind(), "Poll cycle failed"),
            }

            let delay = self.delay_after(&outcome);
            info!("Waiting {} seconds before next check...", delay.as_secs());

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Polling stopped");
    }
}
