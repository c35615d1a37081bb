//! Single-pass order statistics grouped by entity (creator, product, brand).
//!
//! Every dashboard recomputes these maps from a fresh order snapshot; nothing
//! here is incremental or persisted. The builders are total functions:
//! missing amounts count as 0, unknown statuses only bump the order total,
//! and rows without the grouping key are skipped for that dimension.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};

/// Per-entity order statistics, one shape for every grouping dimension.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntityStats {
    pub entity_id: Uuid,
    /// Order count across all statuses, including unknown.
    pub orders: u64,
    /// Completed-only revenue in minor units. Cancelled and pending amounts
    /// never contribute.
    pub gmv: i64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
    pub pending_orders: u64,
    /// Max `created_at` across all statuses, not just completed.
    pub last_order_at: Option<DateTime<Utc>>,
    /// Insertion rank in the snapshot; breaks GMV-ranking ties
    /// deterministically (first seen wins).
    #[serde(skip)]
    pub first_seen: usize,
}

impl EntityStats {
    fn new(entity_id: Uuid, first_seen: usize) -> Self {
        Self {
            entity_id,
            orders: 0,
            gmv: 0,
            completed_orders: 0,
            cancelled_orders: 0,
            pending_orders: 0,
            last_order_at: None,
            first_seen,
        }
    }

    fn record(&mut self, order: &Order) {
        self.orders += 1;
        match order.status {
            Some(OrderStatus::Completed) => {
                self.gmv += order.amount.unwrap_or(0);
                self.completed_orders += 1;
            }
            Some(OrderStatus::Cancelled) => self.cancelled_orders += 1,
            Some(OrderStatus::Pending) => self.pending_orders += 1,
            None => {}
        }
        if self.last_order_at.map_or(true, |t| order.created_at > t) {
            self.last_order_at = Some(order.created_at);
        }
    }
}

/// Group a snapshot by an arbitrary entity key. Rows where `key` returns
/// `None` are excluded from the map entirely.
pub fn stats_by<F>(orders: &[Order], key: F) -> HashMap<Uuid, EntityStats>
where
    F: Fn(&Order) -> Option<Uuid>,
{
    let mut map: HashMap<Uuid, EntityStats> = HashMap::new();
    for order in orders {
        let Some(entity_id) = key(order) else {
            continue;
        };
        let rank = map.len();
        map.entry(entity_id)
            .or_insert_with(|| EntityStats::new(entity_id, rank))
            .record(order);
    }
    map
}

/// Stats grouped by creator.
pub fn creator_stats(orders: &[Order]) -> HashMap<Uuid, EntityStats> {
    stats_by(orders, |o| o.creator_id)
}

/// Stats grouped by product.
pub fn product_stats(orders: &[Order]) -> HashMap<Uuid, EntityStats> {
    stats_by(orders, |o| o.product_id)
}

/// Stats grouped by brand.
pub fn brand_stats(orders: &[Order]) -> HashMap<Uuid, EntityStats> {
    stats_by(orders, |o| o.brand_id)
}

/// Snapshot-wide totals. Unlike the per-entity maps, rows with null foreign
/// keys are counted here.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OrderTotals {
    pub orders: u64,
    pub gmv: i64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
    pub pending_orders: u64,
}

/// Sum the whole snapshot.
pub fn totals(orders: &[Order]) -> OrderTotals {
    let mut t = OrderTotals::default();
    for order in orders {
        t.orders += 1;
        match order.status {
            Some(OrderStatus::Completed) => {
                t.gmv += order.amount.unwrap_or(0);
                t.completed_orders += 1;
            }
            Some(OrderStatus::Cancelled) => t.cancelled_orders += 1,
            Some(OrderStatus::Pending) => t.pending_orders += 1,
            None => {}
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(
        creator: Option<Uuid>,
        status: Option<OrderStatus>,
        amount: Option<i64>,
        day: u32,
    ) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: format!("SR-{day:04}"),
            amount,
            status,
            creator_id: creator,
            product_id: None,
            brand_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 7, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn one_creator_mixed_statuses() {
        let c1 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), Some(OrderStatus::Completed), Some(1000), 1),
            order(Some(c1), Some(OrderStatus::Cancelled), Some(2000), 2),
            order(Some(c1), Some(OrderStatus::Pending), Some(3000), 3),
        ];

        let map = creator_stats(&orders);
        assert_eq!(map.len(), 1);
        let stats = &map[&c1];
        assert_eq!(stats.gmv, 1000);
        assert_eq!(stats.orders, 3);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.cancelled_orders, 1);
        assert_eq!(stats.pending_orders, 1);
    }

    #[test]
    fn empty_snapshot_yields_empty_map() {
        let map = creator_stats(&[]);
        assert!(map.is_empty());
    }

    #[test]
    fn all_cancelled_has_zero_gmv() {
        let c1 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), Some(OrderStatus::Cancelled), Some(5000), 1),
            order(Some(c1), Some(OrderStatus::Cancelled), Some(7000), 2),
        ];

        let stats = &creator_stats(&orders)[&c1];
        assert_eq!(stats.gmv, 0);
        assert_eq!(stats.completed_orders, 0);
        assert_eq!(stats.cancelled_orders, 2);
        assert_eq!(stats.orders, 2);
    }

    #[test]
    fn null_creator_is_excluded_from_map() {
        let c1 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), Some(OrderStatus::Completed), Some(1000), 1),
            order(None, Some(OrderStatus::Completed), Some(9000), 2),
        ];

        let map = creator_stats(&orders);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&c1].gmv, 1000);

        // The keyless order still counts toward snapshot totals.
        let t = totals(&orders);
        assert_eq!(t.orders, 2);
        assert_eq!(t.gmv, 10000);
    }

    #[test]
    fn unknown_status_counts_toward_orders_only() {
        let c1 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), None, Some(4000), 1),
            order(Some(c1), Some(OrderStatus::Completed), Some(1000), 2),
        ];

        let stats = &creator_stats(&orders)[&c1];
        assert_eq!(stats.orders, 2);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.cancelled_orders, 0);
        assert_eq!(stats.pending_orders, 0);
        // 4000 belongs to the unknown-status order, never GMV.
        assert_eq!(stats.gmv, 1000);
        // Status counters sum below the total exactly when unknowns exist.
        assert!(stats.completed_orders + stats.cancelled_orders + stats.pending_orders < stats.orders);
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        let c1 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), Some(OrderStatus::Completed), None, 1),
            order(Some(c1), Some(OrderStatus::Completed), Some(2500), 2),
        ];

        let stats = &creator_stats(&orders)[&c1];
        assert_eq!(stats.gmv, 2500);
        assert_eq!(stats.completed_orders, 2);
    }

    #[test]
    fn last_order_at_spans_all_statuses() {
        let c1 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), Some(OrderStatus::Completed), Some(1000), 5),
            // A later cancelled order still advances recency.
            order(Some(c1), Some(OrderStatus::Cancelled), Some(2000), 20),
        ];

        let stats = &creator_stats(&orders)[&c1];
        assert_eq!(
            stats.last_order_at,
            Some(Utc.with_ymd_and_hms(2026, 7, 20, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn first_seen_follows_input_order() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let orders = vec![
            order(Some(c1), Some(OrderStatus::Pending), None, 1),
            order(Some(c2), Some(OrderStatus::Pending), None, 2),
            order(Some(c1), Some(OrderStatus::Pending), None, 3),
        ];

        let map = creator_stats(&orders);
        assert_eq!(map[&c1].first_seen, 0);
        assert_eq!(map[&c2].first_seen, 1);
    }

    #[test]
    fn product_and_brand_dimensions_group_independently() {
        let p1 = Uuid::new_v4();
        let b1 = Uuid::new_v4();
        let mut o = order(None, Some(OrderStatus::Completed), Some(1500), 1);
        o.product_id = Some(p1);
        o.brand_id = Some(b1);

        let orders = vec![o];
        assert!(creator_stats(&orders).is_empty());
        assert_eq!(product_stats(&orders)[&p1].gmv, 1500);
        assert_eq!(brand_stats(&orders)[&b1].gmv, 1500);
    }
}
