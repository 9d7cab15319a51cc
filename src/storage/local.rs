//! Local filesystem state store.
//!
//! ## Layout
//!
//! ```text
//! {state_dir}/
//! ├── law_status.json        # last law-domain snapshot
//! └── sanctions_status.json  # last sanctions-domain snapshot
//! {logs_dir}/
//! └── log_YYYYMMDD_HHMMSS.json  # append-only, one per alerting run
//! ```
//!
//! Writes go through a temp file and rename, so a crash mid-write cannot
//! leave an unreadable file where a readable one existed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Domain, Snapshot};
use crate::storage::{RunLog, StateStore};

/// Filesystem-backed state store.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    state_dir: PathBuf,
    logs_dir: PathBuf,
}

impl LocalStateStore {
    /// Create a store with explicit state and log directories.
    pub fn new(state_dir: impl Into<PathBuf>, logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            logs_dir: logs_dir.into(),
        }
    }

    fn state_path(&self, domain: Domain) -> PathBuf {
        self.state_dir.join(domain.state_file())
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        Self::write_bytes(path, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match Self::read_bytes(path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// First log path that does not collide with an existing file.
    async fn free_log_path(&self, record: &RunLog) -> PathBuf {
        let base = self.logs_dir.join(record.file_name());
        if !base.exists() {
            return base;
        }
        for n in 1.. {
            let candidate = self.logs_dir.join(format!(
                "log_{}_{}.json",
                record.timestamp.format("%Y%m%d_%H%M%S"),
                n
            ));
            if !candidate.exists() {
                return candidate;
            }
        }
        unreachable!()
    }
}

#[async_trait]
impl StateStore for LocalStateStore {
    async fn load_previous(&self, domain: Domain) -> Snapshot {
        let path = self.state_path(domain);
        match Self::read_json::<Snapshot>(&path).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                log::warn!("No prior {} state at {}", domain, path.display());
                Snapshot::empty()
            }
            Err(e) => {
                log::warn!(
                    "Unreadable {} state at {}: {}. Treating as no prior state.",
                    domain,
                    path.display(),
                    e
                );
                Snapshot::empty()
            }
        }
    }

    async fn persist(&self, domain: Domain, snapshot: &Snapshot) -> Result<()> {
        Self::write_json(&self.state_path(domain), snapshot).await
    }

    async fn append_run_log(&self, record: &RunLog) -> Result<()> {
        let path = self.free_log_path(record).await;
        Self::write_json(&path, record).await?;
        log::info!("Run log written to {}", path.display());
        Ok(())
    }

    async fn list_run_logs(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.logs_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, AlertCategory, FieldValue};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> LocalStateStore {
        LocalStateStore::new(tmp.path().join("state"), tmp.path().join("logs"))
    }

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::at(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        snapshot.set("constitution_last", FieldValue::Date("2025-01-01".into()));
        snapshot.set("nacp_api_ok", FieldValue::Flag(true));
        snapshot.set(
            "ofsi_titles",
            FieldValue::Titles(vec!["Designation A".into()]),
        );
        snapshot
    }

    fn sample_log() -> RunLog {
        RunLog {
            timestamp: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            alerts: vec![Alert::new(AlertCategory::Law, "⚖️ updated")],
            law: sample_snapshot(),
            sanctions: Snapshot::empty(),
        }
    }

    #[tokio::test]
    async fn load_nonexistent_yields_empty_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let snapshot = store.load_previous(Domain::Law).await;
        assert!(snapshot.fields.is_empty());
    }

    #[tokio::test]
    async fn load_corrupt_yields_empty_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        tokio::fs::create_dir_all(tmp.path().join("state"))
            .await
            .unwrap();
        tokio::fs::write(
            tmp.path().join("state").join(Domain::Law.state_file()),
            b"{ not json",
        )
        .await
        .unwrap();

        let snapshot = store.load_previous(Domain::Law).await;
        assert!(snapshot.fields.is_empty());
    }

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let snapshot = sample_snapshot();

        store.persist(Domain::Law, &snapshot).await.unwrap();
        let loaded = store.load_previous(Domain::Law).await;

        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn persist_overwrites_prior_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.persist(Domain::Law, &sample_snapshot()).await.unwrap();

        let mut updated = sample_snapshot();
        updated.set("constitution_last", FieldValue::Date("2025-02-01".into()));
        store.persist(Domain::Law, &updated).await.unwrap();

        let loaded = store.load_previous(Domain::Law).await;
        assert_eq!(loaded.date("constitution_last"), Some("2025-02-01"));
    }

    #[tokio::test]
    async fn domains_use_separate_state_files() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.persist(Domain::Law, &sample_snapshot()).await.unwrap();
        let sanctions = store.load_previous(Domain::Sanctions).await;
        assert!(sanctions.fields.is_empty());
    }

    #[tokio::test]
    async fn run_log_named_from_timestamp() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.append_run_log(&sample_log()).await.unwrap();

        let logs = store.list_run_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(
            logs[0].file_name().unwrap().to_str().unwrap(),
            "log_20250102_030405.json"
        );
    }

    #[tokio::test]
    async fn colliding_run_log_is_not_overwritten() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        let record = sample_log();

        store.append_run_log(&record).await.unwrap();
        store.append_run_log(&record).await.unwrap();

        let logs = store.list_run_logs().await.unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[tokio::test]
    async fn list_run_logs_sorted_and_tolerates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        assert!(store.list_run_logs().await.unwrap().is_empty());

        let mut early = sample_log();
        early.timestamp = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let late = sample_log();

        store.append_run_log(&late).await.unwrap();
        store.append_run_log(&early).await.unwrap();

        let logs = store.list_run_logs().await.unwrap();
        assert!(logs[0].file_name().unwrap() < logs[1].file_name().unwrap());
    }
}
