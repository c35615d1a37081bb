//! Time bucketing and period comparison for dashboard charts.
//!
//! All boundaries, day keys, and hour buckets use UTC. Daily series are
//! dense: a day with no orders is present with zero counts, since charting
//! clients assume a gap-free series.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::models::order::{Order, OrderStatus};

/// A reporting window `[from, to]`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PeriodWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl PeriodWindow {
    /// Window covering the last `days` days ending at `now`.
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            from: now - Duration::days(days),
            to: now,
        }
    }

    pub fn len(&self) -> Duration {
        self.to - self.from
    }

    /// The equal-length window immediately preceding this one:
    /// `[from - len, from)`. Contiguous and non-overlapping, so growth
    /// rates compare like-for-like spans.
    pub fn previous(&self) -> Self {
        Self {
            from: self.from - self.len(),
            to: self.from,
        }
    }

    /// Membership in the current window, inclusive of both ends.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.from <= t && t <= self.to
    }
}

/// Split a snapshot into current-window and previous-window records.
///
/// A record timestamped exactly at `window.from` belongs to the current
/// window only; the previous window is half-open at its upper bound.
pub fn split_by_window<'a>(
    orders: &'a [Order],
    window: &PeriodWindow,
) -> (Vec<&'a Order>, Vec<&'a Order>) {
    let previous = window.previous();
    let mut current_rows = Vec::new();
    let mut previous_rows = Vec::new();
    for order in orders {
        let t = order.created_at;
        if window.contains(t) {
            current_rows.push(order);
        } else if previous.from <= t && t < previous.to {
            previous_rows.push(order);
        }
    }
    (current_rows, previous_rows)
}

/// One day of the dashboard chart series.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Orders created that day, any status.
    pub orders: u64,
    /// Completed-only revenue booked that day.
    pub gmv: i64,
}

/// Bucket a snapshot into one entry per UTC calendar date from `from` to
/// `to` inclusive. Records outside the range are ignored; empty days are
/// kept at zero.
pub fn daily_buckets(orders: &[Order], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<DailyBucket> {
    let start = from.date_naive();
    let end = to.date_naive();
    if end < start {
        return Vec::new();
    }

    let days = (end - start).num_days() as usize + 1;
    let mut buckets: Vec<DailyBucket> = (0..days)
        .map(|i| DailyBucket {
            date: start + Duration::days(i as i64),
            orders: 0,
            gmv: 0,
        })
        .collect();

    for order in orders {
        if order.created_at < from || order.created_at > to {
            continue;
        }
        let idx = (order.created_at.date_naive() - start).num_days() as usize;
        buckets[idx].orders += 1;
        if order.status == Some(OrderStatus::Completed) {
            buckets[idx].gmv += order.amount.unwrap_or(0);
        }
    }
    buckets
}

/// Count records by UTC hour of day, all statuses.
pub fn hourly_histogram(orders: &[Order]) -> [u64; 24] {
    let mut histogram = [0u64; 24];
    for order in orders {
        histogram[order.created_at.hour() as usize] += 1;
    }
    histogram
}

/// The busiest hour: lowest hour achieving the maximum count, `None` when
/// the histogram is all zeros.
pub fn peak_hour(histogram: &[u64; 24]) -> Option<u32> {
    let mut best: Option<(u32, u64)> = None;
    for (hour, &count) in histogram.iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((hour as u32, count));
        }
    }
    best.map(|(hour, _)| hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn order_at(ts: DateTime<Utc>, status: Option<OrderStatus>, amount: Option<i64>) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: "SR-0000".to_string(),
            amount,
            status,
            creator_id: None,
            product_id: None,
            brand_id: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn previous_window_is_contiguous_and_equal_length() {
        let window = PeriodWindow::last_days(ts(31, 0), 30);
        let prev = window.previous();
        assert_eq!(prev.to, window.from);
        assert_eq!(prev.len(), window.len());
    }

    #[test]
    fn boundary_record_belongs_to_current_window_only() {
        let window = PeriodWindow::last_days(ts(31, 0), 10);
        let orders = vec![
            order_at(window.from, Some(OrderStatus::Completed), Some(100)),
            order_at(window.from - Duration::seconds(1), None, None),
            order_at(window.to, None, None),
        ];

        let (current, previous) = split_by_window(&orders, &window);
        assert_eq!(current.len(), 2);
        assert_eq!(previous.len(), 1);
    }

    #[test]
    fn records_outside_both_windows_are_dropped() {
        let window = PeriodWindow::last_days(ts(31, 0), 5);
        let orders = vec![order_at(ts(1, 0), Some(OrderStatus::Completed), Some(100))];

        let (current, previous) = split_by_window(&orders, &window);
        assert!(current.is_empty());
        assert!(previous.is_empty());
    }

    #[test]
    fn daily_buckets_are_dense() {
        let from = ts(1, 0);
        let to = ts(5, 23);
        let orders = vec![
            order_at(ts(1, 9), Some(OrderStatus::Completed), Some(1000)),
            order_at(ts(3, 14), Some(OrderStatus::Cancelled), Some(9999)),
            order_at(ts(3, 15), Some(OrderStatus::Completed), Some(2000)),
        ];

        let buckets = daily_buckets(&orders, from, to);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].orders, 1);
        assert_eq!(buckets[0].gmv, 1000);
        // Day 2 and days 4-5 exist with zeros.
        assert_eq!(buckets[1].orders, 0);
        assert_eq!(buckets[1].gmv, 0);
        assert_eq!(buckets[4].orders, 0);
        // Cancelled amount never reaches the GMV series.
        assert_eq!(buckets[2].orders, 2);
        assert_eq!(buckets[2].gmv, 2000);
    }

    #[test]
    fn daily_buckets_ignore_out_of_range_records() {
        let buckets = daily_buckets(
            &[order_at(ts(20, 0), Some(OrderStatus::Completed), Some(500))],
            ts(1, 0),
            ts(5, 0),
        );
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.orders == 0));
    }

    #[test]
    fn daily_buckets_inverted_range_is_empty() {
        let buckets = daily_buckets(&[], ts(5, 0), ts(1, 0));
        assert!(buckets.is_empty());
    }

    #[test]
    fn hourly_histogram_counts_all_statuses() {
        let orders = vec![
            order_at(ts(1, 9), Some(OrderStatus::Completed), Some(100)),
            order_at(ts(2, 9), Some(OrderStatus::Cancelled), None),
            order_at(ts(3, 21), None, None),
        ];

        let histogram = hourly_histogram(&orders);
        assert_eq!(histogram[9], 2);
        assert_eq!(histogram[21], 1);
        assert_eq!(histogram.iter().sum::<u64>(), 3);
    }

    #[test]
    fn peak_hour_ties_favor_lower_hour() {
        let orders = vec![
            order_at(ts(1, 14), None, None),
            order_at(ts(2, 8), None, None),
            order_at(ts(3, 8), None, None),
            order_at(ts(4, 14), None, None),
        ];
        // Hours 8 and 14 both have 2 records; 8 wins.
        assert_eq!(peak_hour(&hourly_histogram(&orders)), Some(8));
    }

    #[test]
    fn peak_hour_of_empty_histogram_is_none() {
        assert_eq!(peak_hour(&[0u64; 24]), None);
    }
}
