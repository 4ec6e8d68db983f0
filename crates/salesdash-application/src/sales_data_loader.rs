//! Loads the rep roster and the analytics summary for the dashboard.

use std::sync::Arc;
use std::time::Duration;

use salesdash_core::sales::{
    DealStats, SalesAnalytics, SalesRep, filter_by_region, unique_regions,
};
use salesdash_core::service::SalesDataService;
use serde::Serialize;
use tokio::sync::watch;

use crate::deadline::with_deadline;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load sales data. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesDataState {
    pub reps: Vec<SalesRep>,
    pub analytics: Option<SalesAnalytics>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct SalesDataLoader {
    service: Arc<dyn SalesDataService>,
    request_timeout: Duration,
    state: Arc<watch::Sender<SalesDataState>>,
}

impl SalesDataLoader {
    pub fn new(service: Arc<dyn SalesDataService>, request_timeout: Duration) -> Self {
        let (state, _) = watch::channel(SalesDataState::default());
        Self {
            service,
            request_timeout,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> SalesDataState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SalesDataState> {
        self.state.subscribe()
    }

    /// Fetches both endpoints concurrently.
    ///
    /// A call made while a load is running returns the current state without
    /// issuing requests. On failure the previous data stays in place and
    /// `error` is set.
    pub async fn load(&self) -> SalesDataState {
        let started = self.state.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            state.loading = true;
            state.error = None;
            true
        });
        if !started {
            tracing::debug!(target: "sales", "Load already in flight");
            return self.snapshot();
        }

        let result = futures::try_join!(
            with_deadline(
                "sales data",
                self.request_timeout,
                self.service.fetch_sales_data()
            ),
            with_deadline(
                "sales analytics",
                self.request_timeout,
                self.service.fetch_analytics()
            ),
        );

        self.state.send_modify(|state| {
            state.loading = false;
            match result {
                Ok((data, analytics)) => {
                    tracing::info!(
                        target: "sales",
                        "Loaded {} reps, {} deals",
                        data.sales_reps.len(),
                        analytics.total_deal_count
                    );
                    state.reps = data.sales_reps;
                    state.analytics = Some(analytics);
                }
                Err(e) => {
                    tracing::warn!(target: "sales", "Failed to load sales data: {}", e);
                    state.error = Some(LOAD_ERROR_MESSAGE.to_string());
                }
            }
        });
        self.snapshot()
    }

    /// Header card figures, or `None` before the first successful load.
    pub fn deal_stats(&self) -> Option<DealStats> {
        let state = self.state.borrow();
        state
            .analytics
            .as_ref()
            .map(|analytics| DealStats::compute(analytics, &state.reps))
    }

    pub fn regions(&self) -> Vec<String> {
        unique_regions(&self.state.borrow().reps)
    }

    pub fn reps_in_region(&self, region: Option<&str>) -> Vec<SalesRep> {
        filter_by_region(&self.state.borrow().reps, region)
            .into_iter()
            .cloned()
            .collect()
    }
}
