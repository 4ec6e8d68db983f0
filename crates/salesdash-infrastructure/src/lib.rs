//! Infrastructure layer: HTTP services for the dashboard backend and
//! configuration loading.

pub mod ask_service;
pub mod backend_client;
pub mod config_service;
pub mod health_service;
pub mod paths;
pub mod sales_data_service;

pub use crate::ask_service::HttpAskService;
pub use crate::backend_client::BackendClient;
pub use crate::config_service::ConfigService;
pub use crate::health_service::HttpHealthService;
pub use crate::sales_data_service::HttpSalesDataService;
