use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Organization as listed by the identity provider.
///
/// Fields this service does not use (branding, metadata, ...) are kept in
/// `extra` so a persisted snapshot carries the full listing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Organization member as returned by the members endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Member {
    /// Trailing segment of `user_id` (`"github|123456"` -> `"123456"`) when the
    /// account is linked through GitHub.
    pub fn github_id(&self) -> Option<&str> {
        if !self.user_id.contains(GITHUB_MARKER) {
            return None;
        }
        self.user_id
            .rsplit('|')
            .next()
            .filter(|segment| !segment.is_empty())
    }
}

pub const GITHUB_MARKER: &str = "github";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedMember {
    pub name: String,
    pub email: String,
    pub profile_url: Option<String>,
}

impl EnrichedMember {
    pub fn from_member(member: &Member, profile_url: Option<String>) -> Self {
        Self {
            name: member.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            email: member.email.clone().unwrap_or_else(|| "No email".to_string()),
            profile_url,
        }
    }
}

/// Public GitHub profile, only the field we render
#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub html_url: Option<String>,
}
