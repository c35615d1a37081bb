//! Dashboard KPI derivation over aggregated order statistics.
//!
//! Everything here is a pure function of already-built stats; divide-by-zero
//! cases degrade to 0 and a missing comparison denominator yields `None`
//! rather than a fake 0% growth.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::stats::EntityStats;

/// Business-policy thresholds for dashboard flags.
///
/// The defaults are the platform policy: a single entity above half of GMV is
/// a dependency risk, and an entity with no order in the last 30 days and
/// fewer than 10 orders overall is stale.
#[derive(Debug, Clone, Serialize)]
pub struct KpiThresholds {
    /// Concentration percentage strictly above which `dependency_risk` fires.
    pub dependency_risk_pct: f64,
    /// Days without an order before an entity is considered inactive.
    pub stale_after_days: i64,
    /// Entities at or above this lifetime order count are never stale.
    pub stale_min_orders: u64,
}

impl Default for KpiThresholds {
    fn default() -> Self {
        Self {
            dependency_risk_pct: 50.0,
            stale_after_days: 30,
            stale_min_orders: 10,
        }
    }
}

/// Average completed-order value. 0 when nothing completed.
pub fn average_order_value(gmv: i64, completed_orders: u64) -> f64 {
    if completed_orders == 0 {
        return 0.0;
    }
    gmv as f64 / completed_orders as f64
}

/// Completed share of all orders, as a percentage. 0 when the snapshot is
/// empty.
pub fn completion_rate(completed_orders: u64, total_orders: u64) -> f64 {
    if total_orders == 0 {
        return 0.0;
    }
    completed_orders as f64 / total_orders as f64 * 100.0
}

/// Period-over-period GMV growth as a percentage.
///
/// `None` when the previous period had no GMV: a missing denominator is not
/// the same thing as 0% growth.
pub fn growth_rate(current_gmv: i64, previous_gmv: i64) -> Option<f64> {
    if previous_gmv <= 0 {
        return None;
    }
    Some((current_gmv - previous_gmv) as f64 / previous_gmv as f64 * 100.0)
}

/// Entities ranked by GMV descending. Ties resolve by first appearance in
/// the input snapshot, so the ranking is stable across runs regardless of
/// map iteration order.
pub fn rank_by_gmv(stats: &HashMap<Uuid, EntityStats>) -> Vec<&EntityStats> {
    let mut ranked: Vec<&EntityStats> = stats.values().collect();
    ranked.sort_by(|a, b| b.gmv.cmp(&a.gmv).then(a.first_seen.cmp(&b.first_seen)));
    ranked
}

/// Share of total GMV held by the top `n` entities, as a percentage.
/// 0 when there is no GMV at all.
pub fn concentration_ratio(stats: &HashMap<Uuid, EntityStats>, n: usize) -> f64 {
    let total: i64 = stats.values().map(|s| s.gmv).sum();
    if total <= 0 {
        return 0.0;
    }
    let top: i64 = rank_by_gmv(stats).iter().take(n).map(|s| s.gmv).sum();
    top as f64 / total as f64 * 100.0
}

/// Median of a value list. Even lengths average the two middle elements;
/// empty input yields 0.
pub fn median(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Whether a concentration percentage crosses the dependency-risk threshold.
pub fn is_dependency_risk(concentration_pct: f64, thresholds: &KpiThresholds) -> bool {
    concentration_pct > thresholds.dependency_risk_pct
}

/// Whether an entity has gone quiet: no order within the stale window (or
/// ever) and a lifetime order count below the floor.
pub fn is_stale(stats: &EntityStats, now: DateTime<Utc>, thresholds: &KpiThresholds) -> bool {
    if stats.orders >= thresholds.stale_min_orders {
        return false;
    }
    let cutoff = now - Duration::days(thresholds.stale_after_days);
    match stats.last_order_at {
        Some(last) => last < cutoff,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entity(gmv: i64, first_seen: usize) -> EntityStats {
        EntityStats {
            entity_id: Uuid::new_v4(),
            orders: 1,
            gmv,
            completed_orders: 1,
            cancelled_orders: 0,
            pending_orders: 0,
            last_order_at: None,
            first_seen,
        }
    }

    fn map_of(entries: Vec<EntityStats>) -> HashMap<Uuid, EntityStats> {
        entries.into_iter().map(|e| (e.entity_id, e)).collect()
    }

    #[test]
    fn average_order_value_guards_zero() {
        assert_eq!(average_order_value(0, 0), 0.0);
        assert_eq!(average_order_value(30000, 3), 10000.0);
    }

    #[test]
    fn completion_rate_guards_zero() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(3, 4), 75.0);
    }

    #[test]
    fn growth_rate_none_without_previous() {
        // No previous-period GMV means no defined growth, never 0%.
        assert_eq!(growth_rate(5000, 0), None);
        assert_eq!(growth_rate(0, 0), None);
        assert_eq!(growth_rate(15000, 10000), Some(50.0));
        assert_eq!(growth_rate(5000, 10000), Some(-50.0));
    }

    #[test]
    fn rank_breaks_ties_by_first_seen() {
        let a = entity(1000, 2);
        let b = entity(1000, 0);
        let c = entity(2000, 1);
        let ids = (a.entity_id, b.entity_id, c.entity_id);
        let map = map_of(vec![a, b, c]);

        let ranked = rank_by_gmv(&map);
        assert_eq!(ranked[0].entity_id, ids.2);
        // b was seen before a; equal GMV keeps it ahead.
        assert_eq!(ranked[1].entity_id, ids.1);
        assert_eq!(ranked[2].entity_id, ids.0);
    }

    #[test]
    fn concentration_top_one() {
        let map = map_of(vec![entity(6000, 0), entity(3000, 1), entity(1000, 2)]);
        // 6000 / 10000 = 60%
        assert_eq!(concentration_ratio(&map, 1), 60.0);
        // top-3 covers everything
        assert_eq!(concentration_ratio(&map, 3), 100.0);
    }

    #[test]
    fn concentration_of_zero_gmv_is_zero() {
        let map = map_of(vec![entity(0, 0), entity(0, 1)]);
        assert_eq!(concentration_ratio(&map, 1), 0.0);
        assert_eq!(concentration_ratio(&HashMap::new(), 1), 0.0);
    }

    #[test]
    fn median_odd_even_empty() {
        assert_eq!(median(&[10000]), 10000.0);
        assert_eq!(median(&[10000, 30000]), 20000.0);
        assert_eq!(median(&[30000, 10000, 20000]), 20000.0);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn dependency_risk_is_strict() {
        let t = KpiThresholds::default();
        assert!(!is_dependency_risk(50.0, &t));
        assert!(is_dependency_risk(50.1, &t));
    }

    #[test]
    fn stale_requires_both_conditions() {
        let t = KpiThresholds::default();
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();

        let mut quiet = entity(0, 0);
        quiet.orders = 2;
        quiet.last_order_at = Some(now - Duration::days(45));
        assert!(is_stale(&quiet, now, &t));

        // Recent order: not stale even with few orders.
        let mut recent = quiet.clone();
        recent.last_order_at = Some(now - Duration::days(5));
        assert!(!is_stale(&recent, now, &t));

        // High volume: not stale even when quiet.
        let mut busy = quiet.clone();
        busy.orders = 10;
        assert!(!is_stale(&busy, now, &t));

        // Never ordered at all: stale.
        let mut never = quiet.clone();
        never.orders = 0;
        never.last_order_at = None;
        assert!(is_stale(&never, now, &t));
    }
}
