//! Alert data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Alert classification, attached at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Law,
    Sanction,
    #[default]
    System,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Law => "Law",
            AlertCategory::Sanction => "Sanction",
            AlertCategory::System => "System",
        }
    }

    /// Infer a category from message content markers.
    ///
    /// Only used for run logs written before alerts carried a structured
    /// category, where the message text is all there is to go on.
    pub fn infer(message: &str) -> Self {
        if message.contains("⚖️") {
            AlertCategory::Law
        } else if message.contains("🇬🇧") || message.contains("🇺🇸") {
            AlertCategory::Sanction
        } else {
            AlertCategory::System
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single notice that a tracked field changed or failed a liveness check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Structured category for downstream reporting
    pub category: AlertCategory,

    /// Rendered human-readable message
    pub message: String,
}

impl Alert {
    pub fn new(category: AlertCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Render a list of alerts into one outbound notification body.
pub fn render_digest(header: &str, alerts: &[Alert]) -> String {
    let mut body = String::from(header);
    for alert in alerts {
        body.push('\n');
        body.push_str(&alert.message);
    }
    body
}
