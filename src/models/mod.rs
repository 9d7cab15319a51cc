// src/models/mod.rs

//! Domain models for the monitor application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod alert;
mod config;
mod snapshot;

// Re-export all public types
pub use alert::{Alert, AlertCategory, render_digest};
pub use config::{Config, FeedFormat, MonitorConfig, PathsConfig, SourceConfig, SourceKind};
pub use snapshot::{Domain, FieldValue, Snapshot};
