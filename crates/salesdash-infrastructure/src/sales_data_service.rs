//! HttpSalesDataService - reads sales reps and analytics from the backend.

use async_trait::async_trait;
use salesdash_core::sales::{SalesAnalytics, SalesData};
use salesdash_core::service::SalesDataService;
use salesdash_core::{DashError, Result};
use serde::de::DeserializeOwned;

use crate::backend_client::BackendClient;

pub const SALES_DATA_PATH: &str = "/api/data";
pub const SALES_ANALYTICS_PATH: &str = "/api/sales-analytics";

#[derive(Debug, Clone)]
pub struct HttpSalesDataService {
    backend: BackendClient,
}

impl HttpSalesDataService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .backend
            .http()
            .get(self.backend.url(path))
            .send()
            .await
            .map_err(|e| self.backend.send_error(path, e))?;

        if !response.status().is_success() {
            return Err(BackendClient::status_error(path, response).await);
        }

        let body = self.backend.body_text(path, response).await?;
        serde_json::from_str(&body)
            .map_err(|e| DashError::malformed(path, format!("unexpected shape: {}", e)))
    }
}

#[async_trait]
impl SalesDataService for HttpSalesDataService {
    async fn fetch_sales_data(&self) -> Result<SalesData> {
        self.get_json(SALES_DATA_PATH).await
    }

    async fn fetch_analytics(&self) -> Result<SalesAnalytics> {
        self.get_json(SALES_ANALYTICS_PATH).await
    }
}
