use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    Busy,
    Offline,
    OnBreak,
    PendingActivation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    /// Single source of truth for assignment eligibility.
    pub status: DriverStatus,
    pub current_location: Option<GeoPoint>,
    pub rating: f64,
    pub total_deliveries: u64,
    pub total_earnings: f64,
}

/// Fleet-wide aggregates from `/drivers/stats`. Display data only; nothing in
/// the assignment workflow mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverStats {
    pub total_drivers: u64,
    pub available_drivers: u64,
    pub busy_drivers: u64,
    pub total_deliveries: u64,
    pub average_rating: f64,
}

#[cfg(test)]
mod tests {
    use super::DriverStatus;

    #[test]
    fn status_spellings_match_the_wire() {
        let cases = [
            (DriverStatus::Available, "\"available\""),
            (DriverStatus::Busy, "\"busy\""),
            (DriverStatus::Offline, "\"offline\""),
            (DriverStatus::OnBreak, "\"on_break\""),
            (DriverStatus::PendingActivation, "\"pending_activation\""),
        ];

        for (status, expected) in cases {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
            let parsed: DriverStatus = serde_json::from_str(expected).unwrap();
            assert_eq!(parsed, status);
        }
    }
}
