//! Wires the HTTP services and controllers for one backend.

use std::sync::Arc;

use salesdash_core::Result;
use salesdash_core::config::DashboardConfig;
use salesdash_core::service::{AskService, HealthService, SalesDataService};
use salesdash_infrastructure::{
    BackendClient, HttpAskService, HttpHealthService, HttpSalesDataService,
};

use crate::chat_widget::ChatWidget;
use crate::conversation_controller::ConversationController;
use crate::health_monitor::HealthMonitor;
use crate::sales_data_loader::SalesDataLoader;

/// The controllers behind one dashboard page.
#[derive(Clone)]
pub struct Dashboard {
    pub chat: ChatWidget,
    pub health: HealthMonitor,
    pub sales: SalesDataLoader,
    config: DashboardConfig,
}

impl Dashboard {
    /// Builds a dashboard talking HTTP to `config.backend_url`.
    pub fn from_config(config: DashboardConfig) -> Result<Self> {
        let backend = BackendClient::from_config(&config)?;
        tracing::info!("Dashboard backend: {}", backend.base_url());

        Ok(Self::with_services(
            config,
            Arc::new(HttpAskService::new(backend.clone())),
            Arc::new(HttpHealthService::new(backend.clone())),
            Arc::new(HttpSalesDataService::new(backend)),
        ))
    }

    pub fn with_services(
        config: DashboardConfig,
        ask_service: Arc<dyn AskService>,
        health_service: Arc<dyn HealthService>,
        sales_service: Arc<dyn SalesDataService>,
    ) -> Self {
        let timeout = config.request_timeout();
        let conversation = ConversationController::new(ask_service, timeout);
        Self {
            chat: ChatWidget::new(conversation, config.chat.history_on_close),
            health: HealthMonitor::new(health_service, timeout),
            sales: SalesDataLoader::new(sales_service, timeout),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Starts health polling at the configured interval.
    pub fn start(&self) {
        self.health.start_polling(self.config.poll_interval());
    }

    /// Stops polling and ignores anything still in flight.
    pub fn shutdown(&self) {
        self.health.shutdown();
        self.chat.dismiss();
    }
}
