//! Source extraction.
//!
//! Turns raw page/feed content into comparable snapshot values. Extraction
//! never raises to the caller: a fetch or pattern failure degrades to an
//! explicit absent value (dates), `false` (the liveness probe), or an empty
//! title list (feeds).

pub mod feed;
pub mod html_date;

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::Result;
use crate::models::{FieldValue, MonitorConfig, SourceConfig, SourceKind};
use crate::utils::http;

/// Why an extraction produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceReason {
    /// The network fetch failed or timed out
    FetchFailed,
    /// The page was fetched but no configured pattern matched
    PatternMiss,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsenceReason::FetchFailed => f.write_str("fetch failed"),
            AbsenceReason::PatternMiss => f.write_str("no pattern matched"),
        }
    }
}

/// Outcome of a single source extraction.
///
/// Distinguishes "value observed" from "value could not be determined" so
/// callers never have to guess from nullability alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Value(FieldValue),
    Absent(AbsenceReason),
}

impl Extraction {
    /// Collapse into the snapshot representation.
    pub fn into_field_value(self) -> FieldValue {
        match self {
            Extraction::Value(value) => value,
            Extraction::Absent(_) => FieldValue::Missing,
        }
    }
}

/// Fetches sources and extracts comparable values from them.
pub struct SourceExtractor {
    config: MonitorConfig,
    client: reqwest::Client,
}

impl SourceExtractor {
    /// Create an extractor with a configured HTTP client.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = http::create_client(config)?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Extract a comparable value for one source.
    pub async fn extract(&self, source: &SourceConfig) -> Extraction {
        match source.kind {
            SourceKind::HtmlDate => self.extract_date(source).await,
            SourceKind::ApiProbe => Extraction::Value(FieldValue::Flag(self.probe(source).await)),
            SourceKind::FeedTitles => {
                Extraction::Value(FieldValue::Titles(self.fetch_titles(source).await))
            }
        }
    }

    async fn extract_date(&self, source: &SourceConfig) -> Extraction {
        let text = match self.fetch_text(&source.url).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{}: fetch failed: {}", source.name, e);
                return Extraction::Absent(AbsenceReason::FetchFailed);
            }
        };

        match html_date::extract_date(&source.patterns, &text) {
            Some(date) => Extraction::Value(FieldValue::Date(date)),
            None => Extraction::Absent(AbsenceReason::PatternMiss),
        }
    }

    /// HEAD-probe the target; any transport failure counts as unreachable.
    async fn probe(&self, source: &SourceConfig) -> bool {
        let timeout = Duration::from_secs(self.config.probe_timeout_secs);
        match self.client.head(&source.url).timeout(timeout).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                log::warn!("{}: probe failed: {}", source.name, e);
                false
            }
        }
    }

    async fn fetch_titles(&self, source: &SourceConfig) -> Vec<String> {
        let xml = match self.fetch_text(&source.url).await {
            Ok(xml) => xml,
            Err(e) => {
                log::warn!("{}: feed fetch failed: {}", source.name, e);
                return Vec::new();
            }
        };

        let titles = feed::parse_feed_titles(&xml, source.format, self.config.feed_title_limit);
        if titles.is_empty() {
            log::warn!("{}: feed yielded no titles", source.name);
        }
        titles
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(self.client.get(url).send().await?.text().await?)
    }
}
