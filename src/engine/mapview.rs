//! Render-agnostic shape of one route for a map layer: ordered markers plus a
//! polyline. Any mapping library can consume this; nothing here draws.

use tracing::warn;

use crate::api::geocoding::GeocodingClient;
use crate::geo::path_length_km;
use crate::models::driver::GeoPoint;
use crate::models::order::Order;
use crate::models::route::Route;

#[derive(Debug, Clone)]
pub struct RouteMarker {
    pub order_id: String,
    /// 1-based position within the tour sequence.
    pub stop_number: usize,
    pub address: String,
    pub position: GeoPoint,
}

#[derive(Debug, Clone)]
pub struct RouteMapView {
    pub markers: Vec<RouteMarker>,
    pub path: Vec<GeoPoint>,
    pub path_length_km: f64,
    /// Orders left off the map because their address would not resolve.
    pub skipped: Vec<String>,
}

impl RouteMapView {
    /// Geocodes the route's stops one at a time (the geocoding collaborator is
    /// not built for bursts) and collects markers and the connecting path. A
    /// failed lookup drops that stop from the view and nothing else.
    pub async fn build(geocoder: &GeocodingClient, route: &Route, orders: &[Order]) -> Self {
        let mut markers = Vec::new();
        let mut path = Vec::new();
        let mut skipped = Vec::new();

        for (index, order_id) in route.order_ids_in_sequence.iter().enumerate() {
            let Some(address) = stop_address(route, index, order_id, orders) else {
                warn!(order_id, "no address for stop; omitted from map");
                skipped.push(order_id.clone());
                continue;
            };

            match geocoder.search(&address).await {
                Ok(position) => {
                    path.push(position);
                    markers.push(RouteMarker {
                        order_id: order_id.clone(),
                        stop_number: index + 1,
                        address,
                        position,
                    });
                }
                Err(err) => {
                    warn!(order_id, error = %err, "geocoding failed; stop omitted from map");
                    skipped.push(order_id.clone());
                }
            }
        }

        let path_length_km = path_length_km(&path);

        Self {
            markers,
            path,
            path_length_km,
            skipped,
        }
    }
}

fn stop_address(route: &Route, index: usize, order_id: &str, orders: &[Order]) -> Option<String> {
    if let Some(details) = &route.order_details {
        if let Some(detail) = details.get(index) {
            if detail.order_id == order_id && !detail.address.is_empty() {
                return Some(detail.address.clone());
            }
        }
    }

    orders
        .iter()
        .find(|order| order.id == order_id)
        .map(|order| order.delivery_address.clone())
}
