//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{AlertCategory, Domain};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetch behavior settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Filesystem layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Monitored source table; table order is alert order
    #[serde(default = "defaults::default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Sources belonging to one domain, in table order.
    pub fn sources_for(&self, domain: Domain) -> Vec<&SourceConfig> {
        self.sources
            .iter()
            .filter(|s| s.domain == domain)
            .collect()
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.user_agent.trim().is_empty() {
            return Err(AppError::validation("monitor.user_agent is empty"));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(AppError::validation("monitor.timeout_secs must be > 0"));
        }
        if self.monitor.probe_timeout_secs == 0 {
            return Err(AppError::validation(
                "monitor.probe_timeout_secs must be > 0",
            ));
        }
        if self.monitor.notify_timeout_secs == 0 {
            return Err(AppError::validation(
                "monitor.notify_timeout_secs must be > 0",
            ));
        }
        if self.monitor.feed_title_limit == 0 {
            return Err(AppError::validation(
                "monitor.feed_title_limit must be > 0",
            ));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        for source in &self.sources {
            source.validate()?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            paths: PathsConfig::default(),
            sources: defaults::default_sources(),
        }
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout for page and feed fetches, in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Shorter timeout for the HEAD liveness probe
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for outbound notification pushes
    #[serde(default = "defaults::notify_timeout")]
    pub notify_timeout_secs: u64,

    /// Maximum number of feed titles kept per source
    #[serde(default = "defaults::feed_title_limit")]
    pub feed_title_limit: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            probe_timeout_secs: defaults::probe_timeout(),
            notify_timeout_secs: defaults::notify_timeout(),
            feed_title_limit: defaults::feed_title_limit(),
        }
    }
}

/// Filesystem layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding per-domain state files
    #[serde(default = "defaults::state_dir")]
    pub state_dir: String,

    /// Directory for append-only run logs
    #[serde(default = "defaults::logs_dir")]
    pub logs_dir: String,

    /// Directory for exported summary reports
    #[serde(default = "defaults::reports_dir")]
    pub reports_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: defaults::state_dir(),
            logs_dir: defaults::logs_dir(),
            reports_dir: defaults::reports_dir(),
        }
    }
}

/// How a source's raw content is turned into a comparable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Regex date extraction from an HTML page
    HtmlDate,
    /// HEAD reachability check
    ApiProbe,
    /// Title extraction from an XML feed
    FeedTitles,
}

/// Wire format of a feed-titles source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    #[default]
    Atom,
    Rss,
}

/// A single monitored source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Snapshot field this source feeds
    pub field: String,

    /// Human-readable source name
    pub name: String,

    /// Fetch target
    pub url: String,

    /// Extraction strategy
    pub kind: SourceKind,

    /// Domain the field belongs to
    pub domain: Domain,

    /// Ordered regex patterns for `html-date`; first match wins
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Feed wire format for `feed-titles`
    #[serde(default)]
    pub format: FeedFormat,

    /// Alert category attached at detection time
    #[serde(default)]
    pub category: AlertCategory,

    /// Alert message template; `{value}` is replaced with the new value
    pub message: String,
}

impl SourceConfig {
    /// Render the alert message for this source.
    ///
    /// Supported placeholders: `{value}` (the new date or newest title).
    pub fn render_message(&self, value: Option<&str>) -> String {
        self.message
            .replace("{value}", value.unwrap_or(""))
            .trim()
            .to_string()
    }

    fn validate(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(AppError::validation("source field name is empty"));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "source '{}' has an empty name",
                self.field
            )));
        }
        url::Url::parse(&self.url).map_err(|e| {
            AppError::validation(format!("source '{}' has an invalid URL: {}", self.field, e))
        })?;
        if self.kind == SourceKind::HtmlDate {
            if self.patterns.is_empty() {
                return Err(AppError::validation(format!(
                    "html-date source '{}' has no patterns",
                    self.field
                )));
            }
            for pattern in &self.patterns {
                regex::Regex::new(pattern).map_err(|e| {
                    AppError::validation(format!(
                        "source '{}' has an invalid pattern '{}': {}",
                        self.field, pattern, e
                    ))
                })?;
            }
        }
        Ok(())
    }
}

mod defaults {
    use super::{AlertCategory, Domain, FeedFormat, SourceConfig, SourceKind};

    // Monitor defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; treadwatch/1.0)".into()
    }
    pub fn timeout() -> u64 {
        25
    }
    pub fn probe_timeout() -> u64 {
        15
    }
    pub fn notify_timeout() -> u64 {
        15
    }
    pub fn feed_title_limit() -> usize {
        10
    }

    // Path defaults
    pub fn state_dir() -> String {
        "state".into()
    }
    pub fn logs_dir() -> String {
        "logs".into()
    }
    pub fn reports_dir() -> String {
        "reports".into()
    }

    /// Revision-marker pattern used by the zakon.rada.gov.ua pages,
    /// with a bare date-shaped fallback.
    fn revision_patterns() -> Vec<String> {
        vec![
            r"редакція від\s(\d{2}\.\d{2}\.\d{4})".into(),
            r"(\d{2}\.\d{2}\.\d{4})".into(),
        ]
    }

    // Source table defaults
    pub fn default_sources() -> Vec<SourceConfig> {
        vec![
            SourceConfig {
                field: "constitution_last".to_string(),
                name: "Constitution of Ukraine".to_string(),
                url: "https://zakon.rada.gov.ua/laws/show/254%D0%BA/96-%D0%B2%D1%80".to_string(),
                kind: SourceKind::HtmlDate,
                domain: Domain::Law,
                patterns: revision_patterns(),
                format: FeedFormat::Atom,
                category: AlertCategory::Law,
                message: "⚖️ Constitution of Ukraine updated (revision of {value}).".to_string(),
            },
            SourceConfig {
                field: "criminal_code_last".to_string(),
                name: "Criminal Code of Ukraine".to_string(),
                url: "https://zakon.rada.gov.ua/laws/show/2341-14".to_string(),
                kind: SourceKind::HtmlDate,
                domain: Domain::Law,
                patterns: revision_patterns(),
                format: FeedFormat::Atom,
                category: AlertCategory::Law,
                message: "⚖️ Criminal Code of Ukraine amended (revision of {value}).".to_string(),
            },
            SourceConfig {
                field: "civil_code_last".to_string(),
                name: "Civil Code of Ukraine".to_string(),
                url: "https://zakon.rada.gov.ua/laws/show/435-15".to_string(),
                kind: SourceKind::HtmlDate,
                domain: Domain::Law,
                patterns: revision_patterns(),
                format: FeedFormat::Atom,
                category: AlertCategory::Law,
                message: "⚖️ Civil Code of Ukraine updated (revision of {value}).".to_string(),
            },
            SourceConfig {
                field: "nacp_api_ok".to_string(),
                name: "NACP public API".to_string(),
                url: "https://public.nazk.gov.ua/public_api".to_string(),
                kind: SourceKind::ApiProbe,
                domain: Domain::Law,
                patterns: Vec::new(),
                format: FeedFormat::Atom,
                category: AlertCategory::System,
                message: "❌ NACP public API is unreachable.".to_string(),
            },
            SourceConfig {
                field: "ofsi_titles".to_string(),
                name: "OFSI Russia sanctions collection".to_string(),
                url: "https://www.gov.uk/government/collections/uk-sanctions-on-russia.atom"
                    .to_string(),
                kind: SourceKind::FeedTitles,
                domain: Domain::Sanctions,
                patterns: Vec::new(),
                format: FeedFormat::Atom,
                category: AlertCategory::Sanction,
                message: "🇬🇧 OFSI: new sanctions update: {value}".to_string(),
            },
            SourceConfig {
                field: "ofac_titles".to_string(),
                name: "OFAC recent actions".to_string(),
                url: "https://ofac.treasury.gov/rss.xml".to_string(),
                kind: SourceKind::FeedTitles,
                patterns: Vec::new(),
                domain: Domain::Sanctions,
                format: FeedFormat::Rss,
                category: AlertCategory::Sanction,
                message: "🇺🇸 OFAC: new sanctions: {value}".to_string(),
            },
        ]
    }
}
