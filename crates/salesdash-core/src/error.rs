//! Error types for the SalesDash client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the SalesDash client crates.
///
/// Controllers never surface these to the UI directly; they are converted into
/// state (an apology message, an `offline` snapshot) at the controller boundary.
/// The raw `Display` text is kept for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashError {
    /// The request never produced a response (connection refused, DNS, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status} from {endpoint}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response arrived but did not have the expected shape.
    #[error("Malformed payload from {endpoint}: {message}")]
    MalformedPayload { endpoint: String, message: String },

    /// The request did not resolve within the configured timeout.
    #[error("Request to {endpoint} timed out after {millis} ms")]
    Timeout { endpoint: String, millis: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (config file access)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a MalformedPayload error
    pub fn malformed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a Timeout error
    pub fn timeout(endpoint: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            millis: timeout.as_millis() as u64,
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error came from the network layer (no usable response).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }

    /// Check if this is a malformed payload error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. })
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DashError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DashError>`.
pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_timeout_reports_millis() {
        let err = DashError::timeout("/api/ai", Duration::from_secs(10));
        assert!(err.is_timeout());
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Request to /api/ai timed out after 10000 ms");
    }

    #[test]
    fn test_http_status_display() {
        let err = DashError::HttpStatus {
            endpoint: "/health".to_string(),
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "HTTP 502 from /health: Bad Gateway");
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DashError = parse_err.into();
        assert!(matches!(err, DashError::Serialization { ref format, .. } if format == "JSON"));
    }
}
