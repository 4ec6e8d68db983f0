use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// What happens to the conversation when the chat widget is closed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Keep the log; reopening shows the previous exchange.
    #[default]
    Preserve,
    /// Reset the conversation on close.
    Discard,
}

impl std::str::FromStr for HistoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "discard" => Ok(Self::Discard),
            other => Err(format!("unknown history policy '{other}'")),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HealthConfig {
    pub poll_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    pub history_on_close: HistoryPolicy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Root of `config.toml`.
///
/// ```toml
/// backend_url = "http://localhost:8000"
/// request_timeout_secs = 10
///
/// [health]
/// poll_interval_secs = 60
///
/// [chat]
/// history_on_close = "preserve"
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub health: HealthConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            health: HealthConfig::default(),
            chat: ChatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.health.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            backend_url = "http://sales.internal:9000/"

            [chat]
            history_on_close = "discard"
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.poll_interval(), Duration::from_secs(60));
        assert_eq!(config.chat.history_on_close, HistoryPolicy::Discard);
        assert_eq!(config.backend_url, "http://sales.internal:9000/");
    }

    #[test]
    fn test_history_policy_from_str() {
        assert_eq!("Discard".parse::<HistoryPolicy>(), Ok(HistoryPolicy::Discard));
        assert!("forget".parse::<HistoryPolicy>().is_err());
    }
}
