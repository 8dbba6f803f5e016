//! Dispatcher-editable ordering of one driver's active tour. Edits stay local
//! until committed through the applier; the persisted sequence is untouched in
//! between.

use std::collections::HashSet;

use tracing::info;

use crate::engine::pool::active_tour_orders;
use crate::error::DispatchError;
use crate::models::order::Order;
use crate::models::route::Route;

#[derive(Debug, Clone)]
pub struct ManualSequencer {
    driver_id: String,
    sequence: Vec<String>,
}

impl ManualSequencer {
    /// Seeds the list from the driver's currently persisted sequence.
    pub fn from_active_orders(driver_id: &str, orders: &[Order]) -> Self {
        let sequence = active_tour_orders(orders, driver_id)
            .into_iter()
            .map(|order| order.id)
            .collect();

        Self {
            driver_id: driver_id.to_string(),
            sequence,
        }
    }

    /// Seeds the list from a fresh optimizer proposal.
    pub fn from_route(driver_id: &str, route: &Route) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            sequence: route.order_ids_in_sequence.clone(),
        }
    }

    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    /// Moves the element at `from` to `to`. Stable move: every other element
    /// keeps its relative order, nothing is duplicated or dropped.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), DispatchError> {
        let len = self.sequence.len();
        if from >= len || to >= len {
            return Err(DispatchError::Sequence(format!(
                "indices {from}->{to} out of range for {len} stops"
            )));
        }

        let order_id = self.sequence.remove(from);
        self.sequence.insert(to, order_id);
        Ok(())
    }

    /// Reconciles the list with refreshed active-tour membership. When the
    /// membership itself changed (an order delivered or reassigned mid-edit),
    /// the list is re-derived from the refreshed snapshot and local edits are
    /// discarded. Returns whether edits were discarded.
    pub fn resync(&mut self, orders: &[Order]) -> bool {
        let refreshed: Vec<String> = active_tour_orders(orders, &self.driver_id)
            .into_iter()
            .map(|order| order.id)
            .collect();

        let current: HashSet<&str> = self.sequence.iter().map(String::as_str).collect();
        let incoming: HashSet<&str> = refreshed.iter().map(String::as_str).collect();

        if current == incoming {
            return false;
        }

        info!(
            driver_id = %self.driver_id,
            before = self.sequence.len(),
            after = refreshed.len(),
            "tour membership changed; discarding local edits"
        );
        self.sequence = refreshed;
        true
    }
}
