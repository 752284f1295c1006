// src/organizations/notifier.rs
//! Slack message rendering for newly found organizations

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use tracing::info;

use super::models::{EnrichedMember, Organization};
use crate::services::{DeliveryStatus, SlackService};

pub const NO_MEMBERS_LINE: &str = "No members found";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render the Slack message for `org`. Output depends only on the arguments.
pub fn format_message<Tz>(org: &Organization, members: &[EnrichedMember], at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![
        "*New Organization Found!* 🎉".to_string(),
        format!("*Name:* {}", org.name),
        format!("*Display Name:* {}", org.display_name),
        format!("*ID:* {}", org.id),
        format!("*Time:* {}", at.format(TIMESTAMP_FORMAT)),
        "\n*Members:*".to_string(),
    ];

    if members.is_empty() {
        lines.push(NO_MEMBERS_LINE.to_string());
    } else {
        lines.extend(members.iter().map(member_line));
    }

    lines.join("\n")
}

fn member_line(member: &EnrichedMember) -> String {
    let github_link = member
        .profile_url
        .as_deref()
        .map(|url| format!(" (<{}|GitHub>)", url))
        .unwrap_or_default();
    format!("• {} ({}){}", member.name, member.email, github_link)
}

/// Renders, logs, and delivers new-organization notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    slack: SlackService,
}

impl Notifier {
    pub fn new(slack: SlackService) -> Self {
        Self { slack }
    }

    pub async fn notify(&self, org: &Organization, members: &[EnrichedMember]) -> DeliveryStatus {
        let now = Local::now();
        log_organization_details(org, members, &now);
        self.slack.send(&format_message(org, members, &now)).await
    }
}

/// Mirror a notification to the log.
fn log_organization_details(org: &Organization, members: &[EnrichedMember], at: &DateTime<Local>) {
    info!(
        org_id = %org.id,
        name = %org.name,
        display_name = %org.display_name,
        time = %at.format(TIMESTAMP_FORMAT),
        "New organization found"
    );

    if members.is_empty() {
        info!(org_id = %org.id, "  {}", NO_MEMBERS_LINE);
    }
    for member in members {
        info!(org_id = %org.id, "  - {} ({})", member.name, member.email);
    }
}
