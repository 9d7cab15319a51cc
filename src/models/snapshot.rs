//! Snapshot data structures.
//!
//! A snapshot is a timestamped, best-effort set of extracted field values
//! for one monitored domain. Snapshots are immutable once persisted; each
//! monitoring cycle produces a fresh snapshot that replaces the stored one.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored subject area with its own snapshot and state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Law,
    Sanctions,
}

impl Domain {
    /// Name of the per-domain state file.
    pub fn state_file(&self) -> &'static str {
        match self {
            Domain::Law => "law_status.json",
            Domain::Sanctions => "sanctions_status.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Law => "law",
            Domain::Sanctions => "sanctions",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted field value.
///
/// `Missing` round-trips as JSON `null`, so a state file written after a
/// failed extraction still loads field-for-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Reachability flag from an API probe
    Flag(bool),
    /// Calendar date normalized to YYYY-MM-DD
    Date(String),
    /// Feed entry titles in document order
    Titles(Vec<String>),
    /// Extraction produced no value
    Missing,
    /// Unrecognized value from a newer or foreign state file; preserved
    /// as-is so loading stays backward-readable
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_date(&self) -> Option<&str> {
        match self {
            FieldValue::Date(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_titles(&self) -> Option<&[String]> {
        match self {
            FieldValue::Titles(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

/// A timestamped set of extracted field values for one domain.
///
/// Serializes flat, so the persisted document is a plain mapping of field
/// name to last-known value plus a timestamp. Unknown fields in a stored
/// document are loaded into the map untouched; missing fields read as
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    /// Capture time; `None` only for the empty prior-state placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Field name to extracted value
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Snapshot {
    /// Create an empty snapshot representing "no prior state".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot captured at the given time.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            fields: BTreeMap::new(),
        }
    }

    /// Store a field value.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Look up a field; absent keys and explicit `Missing` both read as `None`.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).filter(|v| !v.is_missing())
    }

    /// Date field accessor.
    pub fn date(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_date)
    }

    /// Flag field accessor.
    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_flag)
    }

    /// Title-list field accessor; absent reads as an empty list.
    pub fn titles(&self, field: &str) -> &[String] {
        self.get(field)
            .and_then(FieldValue::as_titles)
            .unwrap_or(&[])
    }
}
