//! Application layer for the sales dashboard.
//!
//! Controllers that sit between the HTTP services and a host UI. Each one owns
//! its state in a `watch` channel; hosts read snapshots or subscribe.

pub mod chat_widget;
pub mod conversation_controller;
pub mod dashboard;
mod deadline;
pub mod health_monitor;
pub mod sales_data_loader;

pub use chat_widget::ChatWidget;
pub use conversation_controller::{ConversationController, SubmitOutcome};
pub use dashboard::Dashboard;
pub use health_monitor::HealthMonitor;
pub use sales_data_loader::{LOAD_ERROR_MESSAGE, SalesDataLoader, SalesDataState};
