//! Sales data domain module.

mod model;
mod stats;

pub use model::{
    Client, Deal, STATUS_CLOSED_LOST, STATUS_CLOSED_WON, STATUS_IN_PROGRESS, SalesAnalytics,
    SalesData, SalesRep,
};
pub use stats::{DealStats, DealTally, filter_by_region, unique_regions};
