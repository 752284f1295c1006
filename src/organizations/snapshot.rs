// src/organizations/snapshot.rs
//! Local JSON file holding the last full organization listing

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::models::Organization;
use crate::common::MonitorError;

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous listing. A missing file is an empty history; any
    /// other read failure or malformed JSON is an error.
    pub async fn load(&self) -> Result<Vec<Organization>, MonitorError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet, starting from empty history");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let orgs: Vec<Organization> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), count = orgs.len(), "Snapshot loaded");
        Ok(orgs)
    }

    /// Sibling file the next snapshot is written to before it replaces
    /// the current one.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the snapshot with `orgs`. The file is written beside the
    /// snapshot and renamed over it, so readers see either the old or the
    /// new listing, never a partial one.
    pub async fn save(&self, orgs: &[Organization]) -> Result<(), MonitorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec(orgs)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), count = orgs.len(), "Snapshot saved");
        Ok(())
    }
}
