//! Backend health domain module.
//!
//! - `model`: snapshot types (`HealthSnapshot`, `ComponentHealth`, statuses)
//! - `normalize`: conversion of raw `/health` payloads into a snapshot

mod model;
mod normalize;

pub use model::{ComponentHealth, ComponentStatus, HealthSnapshot, OverallStatus};
pub use normalize::{FALLBACK_COMPONENT, normalize_component, normalize_health};
