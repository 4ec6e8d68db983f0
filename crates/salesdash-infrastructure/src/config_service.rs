//! Configuration service implementation.
//!
//! Loads [`DashboardConfig`] from `~/.config/salesdash/config.toml` and applies
//! environment overrides on top.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use salesdash_core::config::{DashboardConfig, HistoryPolicy};
use salesdash_core::{DashError, Result};

use crate::paths::SalesdashPaths;

pub const ENV_BACKEND_URL: &str = "SALESDASH_BACKEND_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "SALESDASH_POLL_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SALESDASH_REQUEST_TIMEOUT_SECS";
pub const ENV_CHAT_HISTORY: &str = "SALESDASH_CHAT_HISTORY";

/// Configuration service that loads and caches the dashboard configuration.
///
/// A missing file is not an error: defaults are used and overrides applied.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; `None` resolves the platform default lazily.
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<DashboardConfig>>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses `path` instead of the platform config location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Load errors are logged and fall back to defaults (with env overrides).
    pub fn get_config(&self) -> DashboardConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            apply_env_overrides(DashboardConfig::default(), |key| env::var(key).ok())
        });

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Reads the file (if any) and applies process environment overrides.
    pub fn load(&self) -> Result<DashboardConfig> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => SalesdashPaths::config_file()?,
        };
        let config = load_file(&path)?;
        Ok(apply_env_overrides(config, |key| env::var(key).ok()))
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn load_file(path: &Path) -> Result<DashboardConfig> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(DashboardConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: DashboardConfig = toml::from_str(&content)?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Applies `SALESDASH_*` overrides read through `lookup`.
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides<F>(mut config: DashboardConfig, lookup: F) -> DashboardConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend_url = url.trim().to_string();
    }

    if let Some(secs) = parse_secs(&lookup, ENV_POLL_INTERVAL_SECS) {
        config.health.poll_interval_secs = secs;
    }

    if let Some(secs) = parse_secs(&lookup, ENV_REQUEST_TIMEOUT_SECS) {
        config.request_timeout_secs = secs;
    }

    if let Some(raw) = lookup(ENV_CHAT_HISTORY) {
        match raw.parse::<HistoryPolicy>() {
            Ok(policy) => config.chat.history_on_close = policy,
            Err(e) => tracing::warn!("Ignoring {}: {}", ENV_CHAT_HISTORY, e),
        }
    }

    config
}

fn parse_secs<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            tracing::warn!("Ignoring {}={:?}: expected a positive integer", key, raw);
            None
        }
        Ok(secs) => Some(secs),
    }
}

/// Validates values that would make the client unusable.
pub fn validate(config: &DashboardConfig) -> Result<()> {
    if !(config.backend_url.starts_with("http://") || config.backend_url.starts_with("https://")) {
        return Err(DashError::config(format!(
            "backend_url must start with http:// or https:// (got '{}')",
            config.backend_url
        )));
    }
    if config.request_timeout_secs == 0 {
        return Err(DashError::config("request_timeout_secs must be positive"));
    }
    if config.health.poll_interval_secs == 0 {
        return Err(DashError::config("health.poll_interval_secs must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_file(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_load_file_reads_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend_url = \"http://dash.local\"\n[health]\npoll_interval_secs = 5\n",
        )
        .unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.backend_url, "http://dash.local");
        assert_eq!(config.health.poll_interval_secs, 5);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = [").unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DashError::Serialization { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env_overrides(
            DashboardConfig::default(),
            lookup_from(&[
                (ENV_BACKEND_URL, "https://api.example.com"),
                (ENV_POLL_INTERVAL_SECS, "4"),
                (ENV_REQUEST_TIMEOUT_SECS, "0"),
                (ENV_CHAT_HISTORY, "discard"),
            ]),
        );

        assert_eq!(config.backend_url, "https://api.example.com");
        assert_eq!(config.health.poll_interval_secs, 4);
        // Zero is rejected and the default kept.
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.chat.history_on_close, HistoryPolicy::Discard);
    }

    #[test]
    fn test_cache_is_reused_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 3\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().request_timeout_secs, 3);

        std::fs::write(&path, "request_timeout_secs = 7\n").unwrap();
        assert_eq!(service.get_config().request_timeout_secs, 3);

        service.invalidate_cache();
        assert_eq!(service.get_config().request_timeout_secs, 7);
    }

    #[test]
    fn test_validate() {
        assert!(validate(&DashboardConfig::default()).is_ok());

        let bad_url = DashboardConfig {
            backend_url: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(validate(&bad_url).is_err());
    }
}
