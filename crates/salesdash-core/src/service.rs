//! Backend service traits.
//!
//! Controllers talk to the backend only through these traits, which keeps the
//! application layer free of HTTP details and lets tests substitute scripted
//! services.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::sales::{SalesAnalytics, SalesData};

/// The "ask" endpoint answering free-text questions.
///
/// # Implementation Notes
///
/// Implementations should map every failure (transport, non-2xx status,
/// response without a string `answer`) to a [`crate::DashError`]; the caller
/// decides how it is shown.
#[async_trait]
pub trait AskService: Send + Sync {
    /// Sends one question and returns the `answer` field of the response.
    async fn ask(&self, question: &str) -> Result<String>;
}

/// A decoded `/health` response.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    /// The raw JSON body. Shape varies; see [`crate::health::normalize_health`].
    pub payload: Value,
    /// Round trip measured by the client.
    pub latency: Duration,
}

/// The health endpoint.
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Fetches the current health document.
    ///
    /// A non-2xx response whose body is still a JSON object is returned as a
    /// report, since the backend signals degradation with `503`.
    async fn fetch_health(&self) -> Result<HealthReport>;
}

/// The sales data endpoints.
#[async_trait]
pub trait SalesDataService: Send + Sync {
    async fn fetch_sales_data(&self) -> Result<SalesData>;

    async fn fetch_analytics(&self) -> Result<SalesAnalytics>;
}
