//! Estimation engine: how long a new order should take given its contents
//! and the kitchen's current load.

use crate::model::OrderItem;

/// Floor for any order, in minutes.
const BASE_MINUTES: u32 = 15;
/// Extra minutes per unit beyond the first.
const PER_EXTRA_UNIT_MINUTES: u32 = 3;
/// Extra minutes per order already in flight.
const PER_ACTIVE_ORDER_MINUTES: u32 = 2;
/// Quoted times are capped here no matter the load.
const MAX_MINUTES: u32 = 60;

/// Computes the estimated completion time for an order, in minutes.
///
/// Deterministic and side-effect-free: `base + max(0, (quantity - 1) * 3) +
/// active_count * 2`, capped at 60. `active_count` is measured just before
/// the new order is inserted, so an order never pays for its own load.
pub fn estimate_minutes(items: &[OrderItem], active_count: usize) -> u32 {
    let total_units: u32 = items.iter().map(|item| item.quantity).sum();
    let quantity_extra = total_units.saturating_sub(1) * PER_EXTRA_UNIT_MINUTES;
    let load_extra = active_count as u32 * PER_ACTIVE_ORDER_MINUTES;

    (BASE_MINUTES + quantity_extra + load_extra).min(MAX_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(quantities: &[u32]) -> Vec<OrderItem> {
        quantities
            .iter()
            .map(|&quantity| OrderItem {
                name: "pizza".into(),
                quantity,
                price: 0.0,
            })
            .collect()
    }

    #[test]
    fn single_unit_idle_kitchen_is_base_time() {
        assert_eq!(estimate_minutes(&items(&[1]), 0), 15);
    }

    #[test]
    fn three_units_idle_kitchen() {
        // 15 + (3 - 1) * 3 + 0
        assert_eq!(estimate_minutes(&items(&[2, 1]), 0), 21);
    }

    #[test]
    fn one_unit_with_one_active_order() {
        // 15 + 0 + 1 * 2
        assert_eq!(estimate_minutes(&items(&[1]), 1), 17);
    }

    #[test]
    fn empty_items_cost_nothing_extra() {
        assert_eq!(estimate_minutes(&[], 0), 15);
        assert_eq!(estimate_minutes(&[], 4), 23);
    }

    #[test]
    fn capped_at_one_hour() {
        assert_eq!(estimate_minutes(&items(&[40]), 0), 60);
        assert_eq!(estimate_minutes(&items(&[1]), 100), 60);
    }

    #[test]
    fn formula_holds_across_a_grid() {
        for total_units in 0u32..12 {
            for active in 0usize..10 {
                let expected =
                    (15 + total_units.saturating_sub(1) * 3 + active as u32 * 2).min(60);
                let got = estimate_minutes(&items(&vec![1; total_units as usize]), active);
                assert_eq!(got, expected, "units={total_units} active={active}");
            }
        }
    }
}
