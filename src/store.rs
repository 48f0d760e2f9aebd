use crate::error::FetchError;
use crate::models::RateSnapshot;
use log::{debug, info};
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Owns the single persisted snapshot file and decides when to reuse it and
/// when to refresh it from the remote source. No retries, no backoff: every
/// failure is surfaced to the caller as a typed error.
pub struct SnapshotStore {
    client: Client,
    url: String,
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(SnapshotStore {
            client,
            url: url.into(),
            path: path.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Sibling of the snapshot file, so the rename stays on one filesystem.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Fetches the current rate table and replaces the snapshot file with
    /// the raw response body. The body is staged to a sibling file and
    /// renamed into place, so a failed write cannot destroy the previous
    /// snapshot. The on-disk schema is whatever the remote emits; nothing
    /// is re-serialized.
    pub async fn fetch(&self) -> Result<(), FetchError> {
        info!("fetching exchange rates from {}", self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        let staging = self.staging_path();
        fs::write(&staging, &body)?;
        fs::rename(&staging, &self.path)?;
        debug!("snapshot written to {}", self.path.display());
        Ok(())
    }

    /// Reads and parses the snapshot file. A parse failure on an existing
    /// file is terminal for this call; there is no automatic re-fetch.
    pub fn load(&self) -> Result<RateSnapshot, FetchError> {
        let raw = fs::read(&self.path)?;
        let snapshot = serde_json::from_slice(&raw)?;
        Ok(snapshot)
    }

    /// Loads the existing snapshot, fetching one first only when no file
    /// exists at the snapshot path.
    pub async fn load_or_fetch(&self) -> Result<RateSnapshot, FetchError> {
        if !self.path.exists() {
            self.fetch().await?;
        }
        self.load()
    }

    /// Returns the snapshot unchanged while it is still fresh; once
    /// `now >= next_refresh_at`, fetches a replacement, persists it, and
    /// reloads. This inequality is the sole staleness check.
    pub async fn ensure_fresh(
        &self,
        snapshot: RateSnapshot,
        now: i64,
    ) -> Result<RateSnapshot, FetchError> {
        if !snapshot.is_stale(now) {
            return Ok(snapshot);
        }
        info!(
            "snapshot stale (next refresh at {}, now {}), refreshing",
            snapshot.next_refresh_at, now
        );
        self.fetch().await?;
        self.load()
    }
}
