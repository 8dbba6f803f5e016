use serde::Deserialize;
use tracing::debug;

use crate::api::{decode, transport_error};
use crate::config::Config;
use crate::error::DispatchError;
use crate::models::driver::GeoPoint;

/// Resolves free-text delivery addresses to coordinates. Failures here are
/// expected and callers degrade gracefully; nothing in the workflow treats a
/// missed lookup as fatal.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    base_url: String,
    http: reqwest::Client,
}

impl GeocodingClient {
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

    pub async fn search(&self, address: &str) -> Result<GeoPoint, DispatchError> {
        let url = format!("{}/geocoding/search", self.base_url);
        debug!(%url, address, "GET");

        let response = self
            .http
            .get(&url)
            .query(&[("q", address)])
            .send()
            .await
            .map_err(transport_error)?;
        let found: GeocodeResponse = decode(response).await?;

        Ok(GeoPoint {
            lat: found.latitude,
            lng: found.longitude,
        })
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    latitude: f64,
    longitude: f64,
}
