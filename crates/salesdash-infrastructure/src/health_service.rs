//! HttpHealthService - fetches the backend's `/health` document.

use std::time::Instant;

use async_trait::async_trait;
use salesdash_core::service::{HealthReport, HealthService};
use salesdash_core::{DashError, Result};
use serde_json::Value;

use crate::backend_client::BackendClient;

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct HttpHealthService {
    backend: BackendClient,
}

impl HttpHealthService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl HealthService for HttpHealthService {
    async fn fetch_health(&self) -> Result<HealthReport> {
        let started = Instant::now();

        let response = self
            .backend
            .http()
            .get(self.backend.url(HEALTH_PATH))
            .send()
            .await
            .map_err(|e| self.backend.send_error(HEALTH_PATH, e))?;

        let status = response.status();
        let body = self.backend.body_text(HEALTH_PATH, response).await?;
        let latency = started.elapsed();

        match serde_json::from_str::<Value>(&body) {
            // The backend answers 503 with a full document when degraded.
            Ok(payload) if payload.get("status").is_some() => {
                if !status.is_success() {
                    tracing::debug!(
                        target: "health",
                        "Health endpoint returned {} with a health document",
                        status
                    );
                }
                Ok(HealthReport { payload, latency })
            }
            _ if !status.is_success() => Err(BackendClient::http_status(
                HEALTH_PATH,
                status.as_u16(),
                &body,
            )),
            Ok(_) => Err(DashError::malformed(HEALTH_PATH, "missing field `status`")),
            Err(e) => Err(DashError::malformed(
                HEALTH_PATH,
                format!("invalid JSON: {}", e),
            )),
        }
    }
}
