// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::MonitorConfig;

/// Create a configured asynchronous HTTP client.
///
/// The client-level timeout covers page and feed fetches; probe and notify
/// requests override it per request.
pub fn create_client(config: &MonitorConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
