//! Shared HTTP client for the dashboard backend.

use std::time::Duration;

use reqwest::{Client, Response};
use salesdash_core::config::DashboardConfig;
use salesdash_core::{DashError, Result};

/// Longest slice of an error body kept in [`DashError::HttpStatus`].
const MAX_ERROR_BODY: usize = 200;

/// A reqwest client bound to one backend base URL.
///
/// Every request carries the configured timeout so a hung backend cannot leave
/// a controller pending forever.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BackendClient {
    /// Creates a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.backend_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Maps a failed `send()` to a [`DashError`], keeping timeouts distinct.
    pub(crate) fn send_error(&self, endpoint: &str, err: reqwest::Error) -> DashError {
        if err.is_timeout() {
            DashError::timeout(endpoint, self.timeout)
        } else {
            DashError::transport(format!("{}: {}", endpoint, err))
        }
    }

    /// Reads the body of a non-2xx response into a [`DashError::HttpStatus`].
    pub(crate) async fn status_error(endpoint: &str, response: Response) -> DashError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Self::http_status(endpoint, status, &body)
    }

    /// Builds a [`DashError::HttpStatus`] with the body cut to a readable size.
    pub(crate) fn http_status(endpoint: &str, status: u16, body: &str) -> DashError {
        DashError::HttpStatus {
            endpoint: endpoint.to_string(),
            status,
            body: truncate(body, MAX_ERROR_BODY),
        }
    }

    /// Reads a successful response body as text, mapping read failures.
    pub(crate) async fn body_text(&self, endpoint: &str, response: Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| self.send_error(endpoint, e))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = BackendClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
        assert_eq!(client.url("api/ai"), "http://localhost:8000/api/ai");
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
