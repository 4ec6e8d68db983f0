//! Normalization of `/health` payloads.
//!
//! The health endpoint reports each component either as a boolean, a status
//! string, or an object carrying `status` plus metrics. Everything collapses
//! into [`ComponentHealth`] before the UI sees it.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use super::model::{ComponentHealth, ComponentStatus, HealthSnapshot, OverallStatus};
use crate::error::{DashError, Result};

/// Name of the single component reported when the payload has no usable
/// `components` map.
pub const FALLBACK_COMPONENT: &str = "API";

const HEALTH_ENDPOINT: &str = "/health";

/// Builds a snapshot from a decoded health payload.
///
/// `latency` is the client-measured round trip, reported under the `latency`
/// metric when present.
///
/// # Errors
///
/// Returns [`DashError::MalformedPayload`] when the payload is not an object or
/// carries no string `status`.
pub fn normalize_health(
    payload: &Value,
    latency: Option<Duration>,
    checked_at: DateTime<Utc>,
) -> Result<HealthSnapshot> {
    let root = payload
        .as_object()
        .ok_or_else(|| DashError::malformed(HEALTH_ENDPOINT, "expected a JSON object"))?;

    let raw_status = root
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| DashError::malformed(HEALTH_ENDPOINT, "missing string field `status`"))?;
    let reported = ComponentStatus::parse(raw_status);

    let components = match root.get("components").and_then(Value::as_object) {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(name, value)| normalize_component(name, value))
            .collect(),
        _ => vec![ComponentHealth {
            name: FALLBACK_COMPONENT.to_string(),
            status: reported,
            detail: BTreeMap::new(),
        }],
    };

    let overall_status =
        if reported == ComponentStatus::Up && !components.iter().any(|c| c.status.is_problem()) {
            OverallStatus::Online
        } else {
            OverallStatus::Degraded
        };

    let metrics = aggregate_metrics(root, &components, latency);

    Ok(HealthSnapshot {
        overall_status,
        checked_at: Some(checked_at),
        components,
        metrics,
        raw_error: None,
    })
}

/// Collapses one entry of the `components` map.
pub fn normalize_component(name: &str, value: &Value) -> ComponentHealth {
    let (status, detail) = match value {
        Value::Bool(true) => (ComponentStatus::Up, BTreeMap::new()),
        Value::Bool(false) => (ComponentStatus::Down, BTreeMap::new()),
        Value::String(raw) => (ComponentStatus::parse(raw), BTreeMap::new()),
        Value::Object(fields) => {
            let status = match fields.get("status") {
                Some(Value::String(raw)) => ComponentStatus::parse(raw),
                Some(Value::Bool(true)) => ComponentStatus::Up,
                Some(Value::Bool(false)) => ComponentStatus::Down,
                _ => ComponentStatus::Unknown,
            };
            (status, component_detail(fields))
        }
        _ => (ComponentStatus::Unknown, BTreeMap::new()),
    };

    ComponentHealth {
        name: name.to_string(),
        status,
        detail,
    }
}

fn component_detail(fields: &Map<String, Value>) -> BTreeMap<String, String> {
    let mut detail = BTreeMap::new();

    for (key, value) in fields {
        match (key.as_str(), value) {
            ("status", _) => {}
            ("memory", Value::Number(n)) => {
                detail.insert("memory".to_string(), percent(n));
            }
            ("memory", Value::Object(memory)) => match memory.get("percent") {
                Some(Value::Number(n)) => {
                    detail.insert("memory".to_string(), percent(n));
                }
                _ => flatten_into(&mut detail, key, memory),
            },
            ("cpu", Value::Number(n)) => {
                detail.insert("cpu".to_string(), percent(n));
            }
            ("cpu", Value::Object(cpu)) => {
                if let Some(Value::Number(n)) = cpu.get("usage") {
                    detail.insert("cpu".to_string(), percent(n));
                }
                if let Some(Value::Number(n)) = cpu.get("cores") {
                    detail.insert("cores".to_string(), plain_number(n));
                }
            }
            ("responseTime" | "response_time", Value::Number(n)) => {
                detail.insert("responseTime".to_string(), millis(n));
            }
            (_, Value::Object(nested)) => flatten_into(&mut detail, key, nested),
            (_, scalar) => {
                if let Some(text) = scalar_text(scalar) {
                    detail.insert(key.clone(), text);
                }
            }
        }
    }

    detail
}

fn flatten_into(detail: &mut BTreeMap<String, String>, prefix: &str, nested: &Map<String, Value>) {
    for (key, value) in nested {
        if let Some(text) = scalar_text(value) {
            detail.insert(format!("{prefix}.{key}"), text);
        }
    }
}

fn aggregate_metrics(
    root: &Map<String, Value>,
    components: &[ComponentHealth],
    latency: Option<Duration>,
) -> BTreeMap<String, String> {
    let mut metrics = BTreeMap::new();

    if let Some(version) = root.get("version").and_then(scalar_text) {
        metrics.insert("version".to_string(), version);
    }

    if let Some(server_time) = root
        .get("timestamp")
        .and_then(Value::as_f64)
        .and_then(unix_seconds_to_utc)
    {
        metrics.insert(
            "serverTime".to_string(),
            server_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    let up = components
        .iter()
        .filter(|c| c.status == ComponentStatus::Up)
        .count();
    metrics.insert(
        "componentsUp".to_string(),
        format!("{}/{}", up, components.len()),
    );

    if let Some(latency) = latency {
        metrics.insert("latency".to_string(), format!("{} ms", latency.as_millis()));
    }

    metrics
}

fn unix_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let whole = seconds.trunc() as i64;
    let nanos = ((seconds - seconds.trunc()) * 1e9) as u32;
    DateTime::from_timestamp(whole, nanos)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(plain_number(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn plain_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        n.to_string()
    } else {
        format!("{:.1}", n.as_f64().unwrap_or_default())
    }
}

fn percent(n: &Number) -> String {
    format!("{:.1}%", n.as_f64().unwrap_or_default())
}

fn millis(n: &Number) -> String {
    format!("{:.1} ms", n.as_f64().unwrap_or_default())
}
