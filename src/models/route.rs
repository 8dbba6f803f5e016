//! Transient optimizer output. Routes are never persisted as such; they become
//! each order's `driver_id` and `delivery_sequence` once applied.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStopDetail {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "orderIdsInSequence")]
    pub order_ids_in_sequence: Vec<String>,
    #[serde(rename = "distanceMeters")]
    pub distance_meters: Option<f64>,
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: Option<f64>,
    /// Per-stop addresses aligned with `order_ids_in_sequence`, for map rendering.
    #[serde(rename = "orderDetails")]
    pub order_details: Option<Vec<RouteStopDetail>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub driver_id: String,
    pub route: Route,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignedJob {
    pub order_id: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub assignments: Vec<Assignment>,
    pub orders_total: u32,
    pub orders_assigned: u32,
    pub orders_geocoded: u32,
    /// Count of orders with geocoding problems. Reported independently of
    /// `unassigned_jobs`; the two are neither disjoint nor exhaustive.
    pub geocoding_issues: u32,
    pub drivers_used: u32,
    pub total_distance: f64,
    pub total_duration: f64,
    pub unassigned_jobs: Vec<UnassignedJob>,
}

impl OptimizationResult {
    pub fn assigned_order_ids(&self) -> impl Iterator<Item = &str> {
        self.assignments
            .iter()
            .flat_map(|a| a.route.order_ids_in_sequence.iter())
            .map(String::as_str)
    }

    /// Checks the set-partition contract: no order id may appear twice across
    /// assignment routes and unassigned jobs, and every id must come from the
    /// assignable pool the call was made against.
    pub fn partition_violation(&self, pool_ids: &HashSet<&str>) -> Option<String> {
        let mut seen = HashSet::new();

        let unassigned = self.unassigned_jobs.iter().map(|job| job.order_id.as_str());
        for order_id in self.assigned_order_ids().chain(unassigned) {
            if !seen.insert(order_id) {
                return Some(format!("order {order_id} appears more than once"));
            }
            if !pool_ids.contains(order_id) {
                return Some(format!("order {order_id} is not in the assignable pool"));
            }
        }

        None
    }
}
