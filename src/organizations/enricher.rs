// src/organizations/enricher.rs
//! Member listing plus GitHub profile links

use tracing::{debug, error, warn};

use super::models::EnrichedMember;
use crate::services::{Auth0Service, GitHubService};

#[derive(Debug, Clone)]
pub struct MemberEnricher {
    auth0: Auth0Service,
    github: GitHubService,
}

impl MemberEnricher {
    pub fn new(auth0: Auth0Service, github: GitHubService) -> Self {
        Self { auth0, github }
    }

    /// Members of `org_id`, each with a GitHub profile link where one can be
    /// resolved.
    ///
    /// Never fails: a failed member listing yields an empty list and a failed
    /// profile lookup only drops that member's link.
    pub async fn get_members(&self, org_id: &str, token: &str) -> Vec<EnrichedMember> {
        let members = match self.auth0.list_members(org_id, token).await {
            Ok(members) => members,
            Err(e) => {
                error!(org_id = %org_id, error = %e, "Error getting members");
                return Vec::new();
            }
        };

        debug!(org_id = %org_id, count = members.len(), "Enriching organization members");

        let mut enriched = Vec::with_capacity(members.len());
        for member in &members {
            let profile_url = match member.github_id() {
                Some(github_id) => match self.github.profile_url(github_id).await {
                    Ok(url) => url,
                    Err(e) => {
                        warn!(github_id = %github_id, error = %e, "Error fetching GitHub user info");
                        None
                    }
                },
                None => None,
            };
            enriched.push(EnrichedMember::from_member(member, profile_url));
        }

        enriched
    }
}
