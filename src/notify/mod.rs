//! Outbound notification channel.
//!
//! Push-only, fire-and-forget: every transport failure is logged and
//! swallowed, so notification trouble never blocks persistence or logging.

use std::env;
use std::time::Duration;

use serde_json::json;

/// Notification channel configuration.
///
/// Missing credentials resolve to an explicit `Disabled` variant rather
/// than a sentinel token that gets string-compared at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    Disabled,
    Telegram { bot_token: String, chat_id: String },
}

impl NotifierConfig {
    /// Resolve from the `BOT_TOKEN` and `CHAT_ID` environment variables.
    pub fn from_env() -> Self {
        Self::from_parts(env::var("BOT_TOKEN").ok(), env::var("CHAT_ID").ok())
    }

    /// Resolve from optional credential parts; either one missing or blank
    /// disables sending.
    pub fn from_parts(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        match (bot_token, chat_id) {
            (Some(token), Some(chat)) if !token.trim().is_empty() && !chat.trim().is_empty() => {
                Self::Telegram {
                    bot_token: token,
                    chat_id: chat,
                }
            }
            _ => Self::Disabled,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

/// Best-effort push sink for alert digests.
pub struct Notifier {
    config: NotifierConfig,
    client: reqwest::Client,
    timeout: Duration,
}

impl Notifier {
    pub fn new(config: NotifierConfig, client: reqwest::Client, timeout_secs: u64) -> Self {
        if config.is_disabled() {
            log::info!("Notification credentials not set; sending disabled");
        }
        Self {
            config,
            client,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Push one text message. Never fails; errors are logged at warn.
    pub async fn send(&self, text: &str) {
        let NotifierConfig::Telegram { bot_token, chat_id } = &self.config else {
            log::debug!("Notifications disabled; dropping message");
            return;
        };

        let api = format!("https://api.telegram.org/bot{bot_token}/sendMessage");
        let body = json!({ "chat_id": chat_id, "text": text });

        match self
            .client
            .post(&api)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) if !response.status().is_success() => {
                log::warn!("Notification rejected: HTTP {}", response.status());
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("Notification push failed: {}", e);
            }
        }
    }
}
