//! Commits chosen assignments and sequences to the backend. The only writer in
//! the workflow; every successful mutation invalidates the affected snapshots
//! so the next read re-fetches.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

use crate::api::client::ApiClient;
use crate::engine::sequencer::ManualSequencer;
use crate::error::DispatchError;
use crate::models::route::Assignment;
use crate::state::SnapshotCache;

/// Per-order result of a bulk manual assignment. The applied portion is not
/// rolled back on partial failure; the dispatcher is told exactly which orders
/// went through.
#[derive(Debug)]
pub struct BulkAssignOutcome {
    pub assigned: Vec<String>,
    pub failed: Vec<(String, DispatchError)>,
}

impl BulkAssignOutcome {
    pub fn all_assigned(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct AssignmentApplier {
    client: Arc<ApiClient>,
    cache: Arc<SnapshotCache>,
}

impl AssignmentApplier {
    pub fn new(client: Arc<ApiClient>, cache: Arc<SnapshotCache>) -> Self {
        Self { client, cache }
    }

    /// Commits a reviewed multi-driver optimization result in one batch call.
    /// On error nothing is assumed applied; the collaborator owns atomicity.
    pub async fn apply_batch(
        &self,
        restaurant_id: &str,
        assignments: &[Assignment],
    ) -> Result<u32, DispatchError> {
        let orders_assigned = self
            .client
            .apply_multi_driver(restaurant_id, assignments)
            .await?;

        self.cache.invalidate_orders(restaurant_id);
        self.cache.invalidate_drivers();

        info!(restaurant_id, orders_assigned, "batch assignment applied");
        Ok(orders_assigned)
    }

    pub async fn assign_order(
        &self,
        order_id: &str,
        driver_id: &str,
        estimated_delivery_time: Option<DateTime<Utc>>,
    ) -> Result<String, DispatchError> {
        let message = self
            .client
            .assign_driver(order_id, driver_id, estimated_delivery_time)
            .await?;

        self.cache.invalidate_all_orders();
        self.cache.invalidate_drivers();

        info!(order_id, driver_id, "order assigned");
        Ok(message)
    }

    /// Manual dispatch of several selected orders to one driver. The per-order
    /// calls go out concurrently and all of them are awaited; there is no
    /// ordering guarantee between them and no rollback of the applied portion.
    pub async fn assign_selected(
        &self,
        driver_id: &str,
        order_ids: &[String],
    ) -> BulkAssignOutcome {
        let calls = order_ids.iter().map(|order_id| {
            let client = self.client.clone();
            let order_id = order_id.clone();
            let driver_id = driver_id.to_string();
            async move {
                let result = client.assign_driver(&order_id, &driver_id, None).await;
                (order_id, result)
            }
        });

        let mut outcome = BulkAssignOutcome {
            assigned: Vec::new(),
            failed: Vec::new(),
        };

        for (order_id, result) in join_all(calls).await {
            match result {
                Ok(_) => outcome.assigned.push(order_id),
                Err(err) => {
                    warn!(order_id, error = %err, "bulk assignment call failed");
                    outcome.failed.push((order_id, err));
                }
            }
        }

        if !outcome.assigned.is_empty() {
            self.cache.invalidate_all_orders();
            self.cache.invalidate_drivers();
        }

        info!(
            driver_id,
            assigned = outcome.assigned.len(),
            failed = outcome.failed.len(),
            "bulk assignment settled"
        );
        outcome
    }

    /// Persists a sequence as the driver's authoritative tour order,
    /// overwriting whatever was stored before.
    pub async fn save_tour(
        &self,
        driver_id: &str,
        order_ids_in_sequence: &[String],
    ) -> Result<String, DispatchError> {
        let message = self
            .client
            .save_tour(driver_id, order_ids_in_sequence)
            .await?;

        self.cache.invalidate_all_orders();

        info!(driver_id, stops = order_ids_in_sequence.len(), "tour saved");
        Ok(message)
    }

    pub async fn commit_sequence(
        &self,
        sequencer: &ManualSequencer,
    ) -> Result<String, DispatchError> {
        self.save_tour(sequencer.driver_id(), sequencer.sequence())
            .await
    }
}
