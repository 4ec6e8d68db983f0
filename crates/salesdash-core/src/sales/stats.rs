//! Derived deal statistics and region filtering.

use serde::{Deserialize, Serialize};

use super::model::{
    STATUS_CLOSED_LOST, STATUS_CLOSED_WON, STATUS_IN_PROGRESS, SalesAnalytics, SalesRep,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DealTally {
    pub count: u64,
    pub value: f64,
}

/// Card figures for the dashboard header.
///
/// Counts come from the analytics endpoint; per-status values are summed from
/// the reps' deals since the endpoint only reports the overall total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DealStats {
    pub total: DealTally,
    pub won: DealTally,
    pub lost: DealTally,
    pub running: DealTally,
}

impl DealStats {
    pub fn compute(analytics: &SalesAnalytics, reps: &[SalesRep]) -> Self {
        Self {
            total: DealTally {
                count: analytics.total_deal_count,
                value: analytics.total_deal_value,
            },
            won: DealTally {
                count: analytics.status_count(STATUS_CLOSED_WON),
                value: value_with_status(reps, STATUS_CLOSED_WON),
            },
            lost: DealTally {
                count: analytics.status_count(STATUS_CLOSED_LOST),
                value: value_with_status(reps, STATUS_CLOSED_LOST),
            },
            running: DealTally {
                count: analytics.status_count(STATUS_IN_PROGRESS),
                value: value_with_status(reps, STATUS_IN_PROGRESS),
            },
        }
    }
}

fn value_with_status(reps: &[SalesRep], status: &str) -> f64 {
    reps.iter()
        .flat_map(|rep| rep.deals.iter())
        .filter(|deal| deal.status == status)
        .map(|deal| deal.value)
        .sum()
}

/// Unique regions in first-seen order.
pub fn unique_regions(reps: &[SalesRep]) -> Vec<String> {
    let mut regions: Vec<String> = Vec::new();
    for rep in reps {
        if !regions.contains(&rep.region) {
            regions.push(rep.region.clone());
        }
    }
    regions
}

/// Reps in `region`, or all reps when no region is selected.
pub fn filter_by_region<'a>(reps: &'a [SalesRep], region: Option<&str>) -> Vec<&'a SalesRep> {
    match region.filter(|r| !r.is_empty()) {
        Some(region) => reps.iter().filter(|rep| rep.region == region).collect(),
        None => reps.iter().collect(),
    }
}
