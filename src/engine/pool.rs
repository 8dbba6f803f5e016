//! Selection filters over the latest fetched snapshots. Pure; callers tell a
//! failed fetch apart from an empty result at the fetch site, never here.

use crate::models::driver::{Driver, DriverStatus};
use crate::models::order::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentMode {
    /// Manual dispatch of one or more orders to a single driver.
    Single,
    /// Multi-driver batch optimization; busy drivers may take extra stops.
    Batch,
}

pub fn assignable_orders(orders: &[Order]) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| order.is_assignable())
        .cloned()
        .collect()
}

pub fn eligible_drivers(drivers: &[Driver], mode: AssignmentMode) -> Vec<Driver> {
    drivers
        .iter()
        .filter(|driver| match mode {
            AssignmentMode::Single => driver.status == DriverStatus::Available,
            AssignmentMode::Batch => {
                matches!(driver.status, DriverStatus::Available | DriverStatus::Busy)
            }
        })
        .cloned()
        .collect()
}

/// One driver's active tour, ordered by persisted `delivery_sequence`.
/// Orders without a sequence sort last, by id, so the result is stable.
pub fn active_tour_orders(orders: &[Order], driver_id: &str) -> Vec<Order> {
    let mut tour: Vec<Order> = orders
        .iter()
        .filter(|order| {
            order.driver_id.as_deref() == Some(driver_id) && order.status.is_active_tour()
        })
        .cloned()
        .collect();

    tour.sort_by(|a, b| {
        let a_key = a.delivery_sequence.unwrap_or(u32::MAX);
        let b_key = b.delivery_sequence.unwrap_or(u32::MAX);
        a_key.cmp(&b_key).then_with(|| a.id.cmp(&b.id))
    });
    tour
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{active_tour_orders, assignable_orders, eligible_drivers, AssignmentMode};
    use crate::models::driver::{Driver, DriverStatus};
    use crate::models::order::{Order, OrderStatus};

    fn order(id: &str, status: OrderStatus, driver_id: Option<&str>, seq: Option<u32>) -> Order {
        Order {
            id: id.to_string(),
            status,
            driver_id: driver_id.map(str::to_string),
            delivery_address: format!("Stop {id}"),
            delivery_sequence: seq,
            estimated_delivery_time: None,
            created_at: Utc::now(),
        }
    }

    fn driver(id: &str, status: DriverStatus) -> Driver {
        Driver {
            id: id.to_string(),
            name: format!("Driver {id}"),
            status,
            current_location: None,
            rating: 4.5,
            total_deliveries: 120,
            total_earnings: 1_800.0,
        }
    }

    #[test]
    fn orders_with_a_driver_are_excluded_regardless_of_status() {
        let orders = vec![
            order("o1", OrderStatus::Ready, None, None),
            order("o2", OrderStatus::Ready, Some("d1"), None),
            order("o3", OrderStatus::Pending, Some("d2"), None),
            order("o4", OrderStatus::InProgress, Some("d1"), None),
        ];

        let pool = assignable_orders(&orders);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, "o1");
    }

    #[test]
    fn only_ready_like_statuses_are_assignable() {
        let orders = vec![
            order("o1", OrderStatus::Pending, None, None),
            order("o2", OrderStatus::Ready, None, None),
            order("o3", OrderStatus::Open, None, None),
            order("o4", OrderStatus::InProgress, None, None),
            order("o5", OrderStatus::Delivered, None, None),
            order("o6", OrderStatus::Cancelled, None, None),
            order("o7", OrderStatus::OutForDelivery, None, None),
        ];

        let ids: Vec<String> = assignable_orders(&orders).into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["o1", "o2", "o3", "o4"]);
    }

    #[test]
    fn single_assignment_admits_only_available_drivers() {
        let drivers = vec![
            driver("d1", DriverStatus::Available),
            driver("d2", DriverStatus::Busy),
            driver("d3", DriverStatus::Offline),
            driver("d4", DriverStatus::OnBreak),
            driver("d5", DriverStatus::PendingActivation),
        ];

        let eligible = eligible_drivers(&drivers, AssignmentMode::Single);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, "d1");
    }

    #[test]
    fn batch_assignment_also_admits_busy_drivers() {
        let drivers = vec![
            driver("d1", DriverStatus::Available),
            driver("d2", DriverStatus::Busy),
            driver("d3", DriverStatus::Offline),
            driver("d4", DriverStatus::PendingActivation),
        ];

        let ids: Vec<String> = eligible_drivers(&drivers, AssignmentMode::Batch)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }

    #[test]
    fn active_tour_follows_the_persisted_sequence() {
        let orders = vec![
            order("o1", OrderStatus::Ready, Some("d1"), Some(2)),
            order("o2", OrderStatus::PickedUp, Some("d1"), Some(1)),
            order("o3", OrderStatus::Preparing, Some("d1"), None),
            order("o4", OrderStatus::Delivered, Some("d1"), Some(3)),
            order("o5", OrderStatus::Ready, Some("d2"), Some(1)),
        ];

        let ids: Vec<String> = active_tour_orders(&orders, "d1")
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["o2", "o1", "o3"]);
    }
}
