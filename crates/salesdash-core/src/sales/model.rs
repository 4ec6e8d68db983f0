//! Sales data as served by `/api/data` and `/api/sales-analytics`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const STATUS_CLOSED_WON: &str = "Closed Won";
pub const STATUS_CLOSED_LOST: &str = "Closed Lost";
pub const STATUS_IN_PROGRESS: &str = "In Progress";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub client: String,
    pub value: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

/// A sales representative with their pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRep {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub region: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

/// Body of `/api/data`. A missing `salesReps` field reads as no reps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesData {
    #[serde(default)]
    pub sales_reps: Vec<SalesRep>,
}

/// Body of `/api/sales-analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesAnalytics {
    pub total_deal_count: u64,
    pub deal_status_summary: BTreeMap<String, u64>,
    pub total_deal_value: f64,
    pub average_deal_value: f64,
    pub region_distribution: Vec<String>,
}

impl SalesAnalytics {
    pub fn status_count(&self, status: &str) -> u64 {
        self.deal_status_summary.get(status).copied().unwrap_or(0)
    }
}
