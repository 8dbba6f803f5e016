use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Open,
    PickedUp,
    InProgress,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses an order may hold while still waiting for a driver.
    pub fn is_assignable(self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Ready | OrderStatus::Open | OrderStatus::InProgress
        )
    }

    /// Statuses that keep an order inside its driver's active tour.
    pub fn is_active_tour(self) -> bool {
        matches!(
            self,
            OrderStatus::Ready
                | OrderStatus::PickedUp
                | OrderStatus::Confirmed
                | OrderStatus::Preparing
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub driver_id: Option<String>,
    pub delivery_address: String,
    /// Position within the owning driver's active tour. Rewritten wholesale on
    /// every optimize/save; unique within one driver's active-tour set.
    pub delivery_sequence: Option<u32>,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_assignable(&self) -> bool {
        self.driver_id.is_none() && self.status.is_assignable()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Order, OrderStatus};

    fn order(status: OrderStatus, driver_id: Option<&str>) -> Order {
        Order {
            id: "o1".to_string(),
            status,
            driver_id: driver_id.map(str::to_string),
            delivery_address: "Mönckebergstraße 7, Hamburg".to_string(),
            delivery_sequence: None,
            estimated_delivery_time: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_spellings_match_the_wire() {
        let cases = [
            (OrderStatus::Pending, "\"pending\""),
            (OrderStatus::PickedUp, "\"picked_up\""),
            (OrderStatus::InProgress, "\"in_progress\""),
            (OrderStatus::OutForDelivery, "\"out_for_delivery\""),
            (OrderStatus::Cancelled, "\"cancelled\""),
        ];

        for (status, expected) in cases {
            assert_eq!(serde_json::to_string(&status).unwrap(), expected);
            let parsed: OrderStatus = serde_json::from_str(expected).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn assignable_requires_no_driver() {
        assert!(order(OrderStatus::Ready, None).is_assignable());
        assert!(!order(OrderStatus::Ready, Some("d1")).is_assignable());
    }

    #[test]
    fn delivered_and_cancelled_are_never_assignable() {
        assert!(!order(OrderStatus::Delivered, None).is_assignable());
        assert!(!order(OrderStatus::Cancelled, None).is_assignable());
    }

    #[test]
    fn missing_optional_fields_deserialize_as_none() {
        let raw = r#"{
            "id": "o7",
            "status": "open",
            "driver_id": null,
            "delivery_address": "Ballindamm 40, Hamburg",
            "delivery_sequence": null,
            "estimated_delivery_time": null,
            "created_at": "2026-08-06T10:15:00Z"
        }"#;

        let parsed: Order = serde_json::from_str(raw).unwrap();
        assert!(parsed.driver_id.is_none());
        assert!(parsed.delivery_sequence.is_none());
        assert!(parsed.is_assignable());
    }
}
