//! One dispatcher session against one backend: snapshots in, proposals
//! reviewed, assignments committed, snapshots refreshed.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::api::client::ApiClient;
use crate::api::geocoding::GeocodingClient;
use crate::config::Config;
use crate::engine::applier::{AssignmentApplier, BulkAssignOutcome};
use crate::engine::mapview::RouteMapView;
use crate::engine::pool::{assignable_orders, eligible_drivers, AssignmentMode};
use crate::engine::sequencer::ManualSequencer;
use crate::error::DispatchError;
use crate::models::driver::{Driver, DriverStats};
use crate::models::order::Order;
use crate::models::route::{OptimizationResult, Route};
use crate::state::SnapshotCache;

pub struct Dispatcher {
    client: Arc<ApiClient>,
    geocoder: GeocodingClient,
    cache: Arc<SnapshotCache>,
    applier: AssignmentApplier,
    // One multi-driver optimization in flight per session; a second request is
    // rejected locally while this is set.
    bulk_optimizing: AtomicBool,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Result<Self, DispatchError> {
        let client = Arc::new(ApiClient::new(config)?);
        let geocoder = GeocodingClient::new(config)?;
        let cache = Arc::new(SnapshotCache::new(Duration::seconds(
            config.snapshot_max_age_secs,
        )));
        let applier = AssignmentApplier::new(client.clone(), cache.clone());

        Ok(Self {
            client,
            geocoder,
            cache,
            applier,
            bulk_optimizing: AtomicBool::new(false),
        })
    }

    pub async fn refresh_orders(&self, restaurant_id: &str) -> Result<Vec<Order>, DispatchError> {
        let orders = self.client.list_restaurant_orders(restaurant_id).await?;
        self.cache.put_orders(restaurant_id, orders.clone());
        Ok(orders)
    }

    pub async fn refresh_drivers(&self) -> Result<Vec<Driver>, DispatchError> {
        let drivers = self.client.list_drivers().await?;
        self.cache.put_drivers(drivers.clone());
        Ok(drivers)
    }

    pub async fn orders(&self, restaurant_id: &str) -> Result<Vec<Order>, DispatchError> {
        match self.cache.orders(restaurant_id) {
            Some(orders) => Ok(orders),
            None => self.refresh_orders(restaurant_id).await,
        }
    }

    pub async fn drivers(&self) -> Result<Vec<Driver>, DispatchError> {
        match self.cache.drivers() {
            Some(drivers) => Ok(drivers),
            None => self.refresh_drivers().await,
        }
    }

    pub async fn assignable_orders(&self, restaurant_id: &str) -> Result<Vec<Order>, DispatchError> {
        Ok(assignable_orders(&self.orders(restaurant_id).await?))
    }

    pub async fn eligible_drivers(
        &self,
        mode: AssignmentMode,
    ) -> Result<Vec<Driver>, DispatchError> {
        Ok(eligible_drivers(&self.drivers().await?, mode))
    }

    pub async fn driver_stats(&self) -> Result<DriverStats, DispatchError> {
        self.client.driver_stats().await
    }

    /// Requests a multi-driver partition proposal for the restaurant's
    /// assignable orders. The result is advisory; nothing is persisted until
    /// `apply_optimization`.
    pub async fn optimize_multi_driver(
        &self,
        restaurant_id: &str,
    ) -> Result<OptimizationResult, DispatchError> {
        if self.bulk_optimizing.swap(true, Ordering::SeqCst) {
            return Err(DispatchError::OptimizeInFlight);
        }

        let result = self.run_multi_driver(restaurant_id).await;
        self.bulk_optimizing.store(false, Ordering::SeqCst);
        result
    }

    async fn run_multi_driver(
        &self,
        restaurant_id: &str,
    ) -> Result<OptimizationResult, DispatchError> {
        let pool = self.assignable_orders(restaurant_id).await?;
        let drivers = self.eligible_drivers(AssignmentMode::Batch).await?;
        if drivers.is_empty() {
            return Err(DispatchError::NoEligibleDrivers);
        }

        let driver_ids: Vec<String> = drivers.into_iter().map(|driver| driver.id).collect();
        info!(
            restaurant_id,
            drivers = driver_ids.len(),
            orders = pool.len(),
            "requesting multi-driver optimization"
        );

        let result = self
            .client
            .optimize_multi_driver(restaurant_id, &driver_ids)
            .await?;

        let pool_ids: HashSet<&str> = pool.iter().map(|order| order.id.as_str()).collect();
        if let Some(violation) = result.partition_violation(&pool_ids) {
            return Err(DispatchError::InconsistentResult(violation));
        }

        info!(
            assigned = result.orders_assigned,
            unassigned = result.unassigned_jobs.len(),
            geocoding_issues = result.geocoding_issues,
            "optimization proposal received"
        );
        Ok(result)
    }

    pub async fn apply_optimization(
        &self,
        restaurant_id: &str,
        result: &OptimizationResult,
    ) -> Result<u32, DispatchError> {
        self.applier
            .apply_batch(restaurant_id, &result.assignments)
            .await
    }

    pub async fn assign_order(
        &self,
        order_id: &str,
        driver_id: &str,
        estimated_delivery_time: Option<DateTime<Utc>>,
    ) -> Result<String, DispatchError> {
        self.applier
            .assign_order(order_id, driver_id, estimated_delivery_time)
            .await
    }

    pub async fn assign_selected(
        &self,
        driver_id: &str,
        order_ids: &[String],
    ) -> BulkAssignOutcome {
        self.applier.assign_selected(driver_id, order_ids).await
    }

    /// Proposes an optimized sequence for one driver's active tour. The
    /// persisted sequence is untouched until the proposal is committed.
    pub async fn optimize_tour(
        &self,
        driver_id: &str,
        restaurant_id: &str,
    ) -> Result<Route, DispatchError> {
        self.client.optimize_tour(driver_id, restaurant_id).await
    }

    pub async fn sequencer_for(
        &self,
        driver_id: &str,
        restaurant_id: &str,
    ) -> Result<ManualSequencer, DispatchError> {
        let orders = self.orders(restaurant_id).await?;
        Ok(ManualSequencer::from_active_orders(driver_id, &orders))
    }

    pub async fn commit_sequence(
        &self,
        sequencer: &ManualSequencer,
    ) -> Result<String, DispatchError> {
        self.applier.commit_sequence(sequencer).await
    }

    pub async fn route_map(
        &self,
        restaurant_id: &str,
        route: &Route,
    ) -> Result<RouteMapView, DispatchError> {
        let orders = self.orders(restaurant_id).await?;
        Ok(RouteMapView::build(&self.geocoder, route, &orders).await)
    }
}
