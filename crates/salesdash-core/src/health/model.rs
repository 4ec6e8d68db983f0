//! Health snapshot types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall service state shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// A poll is in flight.
    #[default]
    Checking,
    Online,
    /// Reachable, but unhealthy or with unhealthy components.
    Degraded,
    /// The poll failed or the response could not be understood.
    Offline,
}

impl OverallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "Checking...",
            Self::Online => "online",
            Self::Degraded => "degraded",
            Self::Offline => "offline",
        }
    }
}

/// Status of a single backend component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Up,
    Degraded,
    Down,
    Disabled,
    Unknown,
}

impl ComponentStatus {
    /// Parses the free-form status strings the backend uses.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "ok" | "healthy" | "online" | "available" => Self::Up,
            "degraded" | "warning" | "warn" | "issues" | "slow" => Self::Degraded,
            "down" | "unhealthy" | "error" | "offline" | "failed" | "unavailable" => Self::Down,
            "disabled" | "not_configured" => Self::Disabled,
            _ => Self::Unknown,
        }
    }

    /// Whether this component should pull the overall status to degraded.
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Degraded | Self::Down)
    }
}

/// A component entry after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: ComponentStatus,
    /// Display-ready metrics such as `memory`, `cpu`, `responseTime`.
    pub detail: BTreeMap<String, String>,
}

/// Normalized view of the last resolved poll.
///
/// Replaced wholesale on every poll; there is no history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub overall_status: OverallStatus,
    /// When the poll resolved. `None` until the first poll finishes.
    pub checked_at: Option<DateTime<Utc>>,
    pub components: Vec<ComponentHealth>,
    pub metrics: BTreeMap<String, String>,
    /// Set only when the poll itself failed (network, timeout, parse).
    pub raw_error: Option<String>,
}

impl HealthSnapshot {
    /// Snapshot for a poll that could not produce a usable response.
    pub fn offline(raw_error: impl Into<String>, checked_at: DateTime<Utc>) -> Self {
        Self {
            overall_status: OverallStatus::Offline,
            checked_at: Some(checked_at),
            components: Vec::new(),
            metrics: BTreeMap::new(),
            raw_error: Some(raw_error.into()),
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentHealth> {
        self.components.iter().find(|c| c.name == name)
    }
}
