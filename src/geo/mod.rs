use crate::models::driver::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Total length of a polyline, leg by leg. Zero for fewer than two points.
pub fn path_length_km(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|leg| haversine_km(&leg[0], &leg[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{haversine_km, path_length_km};
    use crate::models::driver::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 53.5511,
            lng: 9.9937,
        };
        let distance = haversine_km(&p, &p);
        assert!(distance < 1e-9);
    }

    #[test]
    fn hamburg_to_berlin_is_around_255_km() {
        let hamburg = GeoPoint {
            lat: 53.5511,
            lng: 9.9937,
        };
        let berlin = GeoPoint {
            lat: 52.5200,
            lng: 13.4050,
        };
        let distance = haversine_km(&hamburg, &berlin);
        assert!((distance - 255.0).abs() < 5.0);
    }

    #[test]
    fn path_length_sums_the_legs() {
        let a = GeoPoint { lat: 53.55, lng: 9.99 };
        let b = GeoPoint { lat: 53.56, lng: 10.01 };
        let c = GeoPoint { lat: 53.57, lng: 10.03 };

        let total = path_length_km(&[a, b, c]);
        let legs = haversine_km(&a, &b) + haversine_km(&b, &c);
        assert!((total - legs).abs() < 1e-9);
    }

    #[test]
    fn short_paths_have_zero_length() {
        assert_eq!(path_length_km(&[]), 0.0);
        let p = GeoPoint { lat: 1.0, lng: 2.0 };
        assert_eq!(path_length_km(&[p]), 0.0);
    }
}
