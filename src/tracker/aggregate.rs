//! Status aggregator: derives the restaurant-wide load summary from the
//! active set.

use crate::model::Order;

/// Quoted wait when nothing is in flight.
const IDLE_WAIT_MINUTES: u32 = 25;
/// Lower clamp on the quoted average wait.
const MIN_AVG_WAIT_MINUTES: u32 = 20;
/// Upper clamp on the quoted average wait.
const MAX_AVG_WAIT_MINUTES: u32 = 50;

/// Derived restaurant-wide summary. Purely a function of the active set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub current_orders: usize,
    pub average_wait_time: u32,
    pub label: &'static str,
}

/// Human-readable load descriptor for a given number of in-flight orders.
pub fn load_label(active_count: usize) -> &'static str {
    match active_count {
        0 => "accepting orders",
        1..=2 => "normal operation",
        3..=5 => "moderate demand",
        _ => "peak hours - high demand",
    }
}

/// Recomputes the aggregate from the current active set.
///
/// The average wait is the floor of the mean ETA, clamped to [20, 50];
/// with no active orders it is a constant 25.
pub fn summarize(active: &[Order]) -> StatusSummary {
    let current_orders = active.len();
    let average_wait_time = if active.is_empty() {
        IDLE_WAIT_MINUTES
    } else {
        let total: u32 = active.iter().map(|order| order.estimated_time).sum();
        (total / current_orders as u32).clamp(MIN_AVG_WAIT_MINUTES, MAX_AVG_WAIT_MINUTES)
    };

    StatusSummary {
        current_orders,
        average_wait_time,
        label: load_label(current_orders),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewOrder;
    use chrono::Utc;

    fn orders_with_etas(etas: &[u32]) -> Vec<Order> {
        etas.iter()
            .map(|&eta| {
                Order::new(
                    0,
                    NewOrder {
                        items: vec![],
                        total: 0.0,
                        customer: None,
                        payment: None,
                    },
                    eta,
                    Utc::now(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_set_quotes_idle_wait() {
        let summary = summarize(&[]);
        assert_eq!(summary.current_orders, 0);
        assert_eq!(summary.average_wait_time, 25);
        assert_eq!(summary.label, "accepting orders");
    }

    #[test]
    fn average_uses_floor_division() {
        // (15 + 16 + 16) / 3 = 15 -> clamped up to 20
        let summary = summarize(&orders_with_etas(&[15, 16, 16]));
        assert_eq!(summary.average_wait_time, 20);

        // (21 + 22) / 2 = 21
        let summary = summarize(&orders_with_etas(&[21, 22]));
        assert_eq!(summary.average_wait_time, 21);
    }

    #[test]
    fn average_is_clamped_to_band() {
        assert_eq!(summarize(&orders_with_etas(&[15])).average_wait_time, 20);
        assert_eq!(summarize(&orders_with_etas(&[60, 60])).average_wait_time, 50);
        for etas in [&[20u32, 30, 40][..], &[25][..], &[50, 20][..]] {
            let wait = summarize(&orders_with_etas(etas)).average_wait_time;
            assert!((20..=50).contains(&wait));
        }
    }

    #[test]
    fn label_band_edges() {
        assert_eq!(load_label(0), "accepting orders");
        assert_eq!(load_label(1), "normal operation");
        assert_eq!(load_label(2), "normal operation");
        assert_eq!(load_label(3), "moderate demand");
        assert_eq!(load_label(5), "moderate demand");
        assert_eq!(load_label(6), "peak hours - high demand");
        assert_eq!(load_label(11), "peak hours - high demand");
    }
}
