// src/pipeline/export.rs

//! Report aggregation over accumulated run logs.
//!
//! Flattens every logged alert into `{timestamp, category, message}`
//! records and writes both a JSON summary (counts by category plus all
//! records) and a flat CSV with the same three columns.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{AlertCategory, Config};
use crate::storage::StateStore;

/// One flattened alert occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub timestamp: String,
    pub category: String,
    pub message: String,
}

/// Per-category record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    #[serde(rename = "Law")]
    pub law: usize,
    #[serde(rename = "Sanction")]
    pub sanction: usize,
    #[serde(rename = "System")]
    pub system: usize,
}

impl CategoryCounts {
    fn bump(&mut self, category: AlertCategory) {
        match category {
            AlertCategory::Law => self.law += 1,
            AlertCategory::Sanction => self.sanction += 1,
            AlertCategory::System => self.system += 1,
        }
    }
}

/// The exported summary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub by_category: CategoryCounts,
    pub records: Vec<AlertRecord>,
}

/// A logged alert as found on disk.
///
/// Current logs carry structured `{category, message}` objects; logs from
/// before the category field existed are plain strings and fall back to
/// marker inference.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LoggedAlert {
    Structured {
        category: AlertCategory,
        message: String,
    },
    Legacy(String),
}

impl LoggedAlert {
    fn into_parts(self) -> (AlertCategory, String) {
        match self {
            LoggedAlert::Structured { category, message } => (category, message),
            LoggedAlert::Legacy(message) => (AlertCategory::infer(&message), message),
        }
    }
}

/// The subset of a run log the exporter cares about.
#[derive(Debug, Deserialize)]
struct LoggedRun {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    alerts: Vec<LoggedAlert>,
}

/// Aggregate all run logs into `summary.json` and `summary.csv`.
pub async fn run_export(config: &Config, store: &dyn StateStore) -> Result<ExportSummary> {
    let mut records = Vec::new();
    let mut by_category = CategoryCounts::default();

    for path in store.list_run_logs().await? {
        let bytes = tokio::fs::read(&path).await?;
        let run: LoggedRun = match serde_json::from_slice(&bytes) {
            Ok(run) => run,
            Err(e) => {
                log::warn!("Skipping unreadable log {}: {}", path.display(), e);
                continue;
            }
        };

        let timestamp = run
            .timestamp
            .unwrap_or_else(|| timestamp_from_file_name(&path));

        for alert in run.alerts {
            let (category, message) = alert.into_parts();
            by_category.bump(category);
            records.push(AlertRecord {
                timestamp: timestamp.clone(),
                category: category.as_str().to_string(),
                message,
            });
        }
    }

    let summary = ExportSummary {
        generated_at: Utc::now(),
        total_records: records.len(),
        by_category,
        records,
    };

    let reports_dir = PathBuf::from(&config.paths.reports_dir);
    tokio::fs::create_dir_all(&reports_dir).await?;

    let json_path = reports_dir.join("summary.json");
    tokio::fs::write(&json_path, serde_json::to_vec_pretty(&summary)?).await?;

    let csv_path = reports_dir.join("summary.csv");
    write_csv(&csv_path, &summary.records)?;

    log::info!(
        "Export complete: {} records saved to {}",
        summary.total_records,
        reports_dir.display()
    );

    Ok(summary)
}

/// Fallback timestamp for logs whose document lacks one: the capture time
/// encoded in the file name.
fn timestamp_from_file_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.trim_start_matches("log_").to_string())
        .unwrap_or_default()
}

fn write_csv(path: &Path, records: &[AlertRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "category", "message"])?;
    for record in records {
        writer.write_record([&record.timestamp, &record.category, &record.message])?;
    }
    writer.flush()?;
    Ok(())
}
