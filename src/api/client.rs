//! Client for the dispatch backend's optimization and assignment endpoints.
//! Every call is a single request/response round trip; no retries.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{decode, transport_error};
use crate::config::Config;
use crate::error::DispatchError;
use crate::models::driver::{Driver, DriverStats};
use crate::models::order::Order;
use crate::models::route::{Assignment, OptimizationResult, Route};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| DispatchError::Config(format!("http client: {err}")))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn optimize_tour(
        &self,
        driver_id: &str,
        restaurant_id: &str,
    ) -> Result<Route, DispatchError> {
        let response: OptimizeTourResponse = self
            .post_json(
                &format!("/drivers/{driver_id}/optimize-tour"),
                &OptimizeTourRequest { restaurant_id },
            )
            .await?;
        Ok(response.route)
    }

    pub async fn save_tour(
        &self,
        driver_id: &str,
        order_ids: &[String],
    ) -> Result<String, DispatchError> {
        let response: MessageAck = self
            .post_json(
                &format!("/drivers/{driver_id}/save-tour"),
                &SaveTourRequest { order_ids },
            )
            .await?;
        Ok(response.message)
    }

    pub async fn optimize_multi_driver(
        &self,
        restaurant_id: &str,
        driver_ids: &[String],
    ) -> Result<OptimizationResult, DispatchError> {
        self.post_json(
            &format!("/restaurants/{restaurant_id}/optimize-multi-driver"),
            &MultiDriverRequest { driver_ids },
        )
        .await
    }

    pub async fn apply_multi_driver(
        &self,
        restaurant_id: &str,
        assignments: &[Assignment],
    ) -> Result<u32, DispatchError> {
        let response: ApplyResponse = self
            .post_json(
                &format!("/restaurants/{restaurant_id}/apply-multi-driver-optimization"),
                &ApplyRequest { assignments },
            )
            .await?;
        Ok(response.orders_assigned)
    }

    pub async fn assign_driver(
        &self,
        order_id: &str,
        driver_id: &str,
        estimated_delivery_time: Option<DateTime<Utc>>,
    ) -> Result<String, DispatchError> {
        let response: MessageAck = self
            .post_json(
                &format!("/orders/{order_id}/assign-driver"),
                &AssignDriverRequest {
                    driver_id,
                    estimated_delivery_time,
                },
            )
            .await?;
        Ok(response.message)
    }

    pub async fn list_restaurant_orders(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Order>, DispatchError> {
        self.get_json(&format!("/restaurants/{restaurant_id}/orders"))
            .await
    }

    pub async fn list_drivers(&self) -> Result<Vec<Driver>, DispatchError> {
        let response: DriversResponse = self.get_json("/drivers").await?;
        Ok(response.drivers)
    }

    pub async fn driver_stats(&self) -> Result<DriverStats, DispatchError> {
        let response: StatsResponse = self.get_json("/drivers/stats").await?;
        Ok(response.stats)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, DispatchError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DispatchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        decode(response).await
    }
}

#[derive(Serialize)]
struct OptimizeTourRequest<'a> {
    restaurant_id: &'a str,
}

#[derive(Deserialize)]
struct OptimizeTourResponse {
    route: Route,
}

#[derive(Serialize)]
struct SaveTourRequest<'a> {
    order_ids: &'a [String],
}

#[derive(Serialize)]
struct MultiDriverRequest<'a> {
    driver_ids: &'a [String],
}

#[derive(Serialize)]
struct ApplyRequest<'a> {
    assignments: &'a [Assignment],
}

#[derive(Deserialize)]
struct ApplyResponse {
    orders_assigned: u32,
}

#[derive(Serialize)]
struct AssignDriverRequest<'a> {
    driver_id: &'a str,
    estimated_delivery_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct MessageAck {
    message: String,
}

#[derive(Deserialize)]
struct DriversResponse {
    drivers: Vec<Driver>,
}

#[derive(Deserialize)]
struct StatsResponse {
    stats: DriverStats,
}
