//! State persistence boundary.
//!
//! Maps each domain to its last-known snapshot file and owns the
//! append-only run log directory. Missing or corrupt prior state degrades
//! to an empty snapshot; a failed persist is a hard error.

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Alert, Domain, Snapshot};

// Re-export for convenience
pub use local::LocalStateStore;

/// Record written when a monitoring cycle produced at least one alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    /// Capture time of the cycle
    pub timestamp: DateTime<Utc>,
    /// Alerts in detection order
    pub alerts: Vec<Alert>,
    /// Law-domain snapshot that produced them
    pub law: Snapshot,
    /// Sanctions-domain snapshot that produced them
    pub sanctions: Snapshot,
}

impl RunLog {
    /// Deterministic log file name, second resolution.
    pub fn file_name(&self) -> String {
        format!("log_{}.json", self.timestamp.format("%Y%m%d_%H%M%S"))
    }
}

/// Trait for snapshot state backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last persisted snapshot for a domain.
    ///
    /// First run and corruption are indistinguishable; both yield the
    /// empty snapshot.
    async fn load_previous(&self, domain: Domain) -> Snapshot;

    /// Persist a snapshot, replacing the prior one.
    async fn persist(&self, domain: Domain, snapshot: &Snapshot) -> Result<()>;

    /// Append a run log record; existing logs are never overwritten.
    async fn append_run_log(&self, record: &RunLog) -> Result<()>;

    /// All run log files, sorted by name.
    async fn list_run_logs(&self) -> Result<Vec<PathBuf>>;
}
