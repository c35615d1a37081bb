//! Dashboard assembly: parallel row fetches feeding the pure aggregation
//! modules.
//!
//! This is the only dashboard layer that touches the database. Each builder
//! fetches one span of rows covering the current and previous reporting
//! windows, partitions it, and derives every number through `stats`, `kpi`,
//! and `timeseries`. Builders are split from fetchers so the derivation is
//! testable on in-memory snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::order::Order;

use super::fraud::{self, FraudSummary};
use super::kpi::{self, KpiThresholds};
use super::payout;
use super::stats::{self, EntityStats, OrderTotals};
use super::timeseries::{self, DailyBucket, PeriodWindow};

/// Leaderboard depth on every dashboard.
const TOP_N: usize = 5;

/// One leaderboard row. `name` is hydrated from the entity table after the
/// pure derivation.
#[derive(Debug, Clone, Serialize)]
pub struct EntityLeader {
    pub entity_id: Uuid,
    pub name: Option<String>,
    pub orders: u64,
    pub gmv: i64,
    pub completed_orders: u64,
    pub average_order_value: f64,
    pub last_order_at: Option<DateTime<Utc>>,
}

impl From<&EntityStats> for EntityLeader {
    fn from(s: &EntityStats) -> Self {
        Self {
            entity_id: s.entity_id,
            name: None,
            orders: s.orders,
            gmv: s.gmv,
            completed_orders: s.completed_orders,
            average_order_value: kpi::average_order_value(s.gmv, s.completed_orders),
            last_order_at: s.last_order_at,
        }
    }
}

/// Platform-wide overview for operators.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub window: PeriodWindow,
    pub totals: OrderTotals,
    pub average_order_value: f64,
    pub completion_rate: f64,
    pub median_completed_amount: f64,
    /// GMV growth vs the previous window; absent when that window had none.
    pub gmv_growth_pct: Option<f64>,
    pub top_creators: Vec<EntityLeader>,
    pub top_products: Vec<EntityLeader>,
    /// Share of GMV held by the single largest creator.
    pub creator_concentration_pct: f64,
    pub dependency_risk: bool,
    pub daily_series: Vec<DailyBucket>,
    pub hourly_histogram: [u64; 24],
    pub peak_hour: Option<u32>,
    pub fraud: FraudSummary,
    pub pending_creator_payouts: i64,
}

/// Fetch and assemble the admin dashboard for a reporting window.
pub async fn admin_dashboard(
    pool: &PgPool,
    window: PeriodWindow,
) -> Result<AdminDashboard, AppError> {
    let span_from = window.previous().from;
    let (rows, fraud_summary, pending_payouts) = tokio::try_join!(
        super::order::fetch_window(pool, span_from, window.to),
        fraud::summary(pool),
        payout::pending_creator_total(pool),
    )?;

    let (current, previous) = partition(&rows, &window);
    let mut dashboard = build_admin(
        &current,
        &previous,
        fraud_summary,
        pending_payouts,
        window,
        &KpiThresholds::default(),
    );
    attach_creator_names(pool, &mut dashboard.top_creators).await?;
    attach_product_names(pool, &mut dashboard.top_products).await?;
    Ok(dashboard)
}

/// Derive the admin dashboard from in-memory snapshots.
fn build_admin(
    current: &[Order],
    previous: &[Order],
    fraud: FraudSummary,
    pending_creator_payouts: i64,
    window: PeriodWindow,
    thresholds: &KpiThresholds,
) -> AdminDashboard {
    let totals = stats::totals(current);
    let previous_totals = stats::totals(previous);

    let creators = stats::creator_stats(current);
    let products = stats::product_stats(current);

    let concentration = kpi::concentration_ratio(&creators, 1);
    let histogram = timeseries::hourly_histogram(current);

    AdminDashboard {
        window,
        average_order_value: kpi::average_order_value(totals.gmv, totals.completed_orders),
        completion_rate: kpi::completion_rate(totals.completed_orders, totals.orders),
        median_completed_amount: kpi::median(&completed_amounts(current)),
        gmv_growth_pct: kpi::growth_rate(totals.gmv, previous_totals.gmv),
        top_creators: leaderboard(&creators),
        top_products: leaderboard(&products),
        creator_concentration_pct: concentration,
        dependency_risk: kpi::is_dependency_risk(concentration, thresholds),
        daily_series: timeseries::daily_buckets(current, window.from, window.to),
        peak_hour: timeseries::peak_hour(&histogram),
        hourly_histogram: histogram,
        fraud,
        pending_creator_payouts,
        totals,
    }
}

/// A creator's own view of their performance.
#[derive(Debug, Clone, Serialize)]
pub struct CreatorDashboard {
    pub creator_id: Uuid,
    pub window: PeriodWindow,
    pub totals: OrderTotals,
    pub average_order_value: f64,
    pub completion_rate: f64,
    pub gmv_growth_pct: Option<f64>,
    pub top_products: Vec<EntityLeader>,
    pub daily_series: Vec<DailyBucket>,
    /// No order within the stale window and below the order-count floor.
    pub stale: bool,
    pub pending_payout_total: i64,
}

/// Fetch and assemble a creator's dashboard.
pub async fn creator_dashboard(
    pool: &PgPool,
    creator_id: Uuid,
    window: PeriodWindow,
) -> Result<CreatorDashboard, AppError> {
    let span_from = window.previous().from;
    let (rows, pending_payout_total) = tokio::try_join!(
        fetch_span_for_creator(pool, creator_id, span_from, window.to),
        pending_payouts_for_creator(pool, creator_id),
    )?;

    let (current, previous) = partition(&rows, &window);
    let mut dashboard = build_creator(
        creator_id,
        &current,
        &previous,
        pending_payout_total,
        window,
        &KpiThresholds::default(),
    );
    attach_product_names(pool, &mut dashboard.top_products).await?;
    Ok(dashboard)
}

/// Derive a creator dashboard from in-memory snapshots of that creator's
/// orders.
fn build_creator(
    creator_id: Uuid,
    current: &[Order],
    previous: &[Order],
    pending_payout_total: i64,
    window: PeriodWindow,
    thresholds: &KpiThresholds,
) -> CreatorDashboard {
    let totals = stats::totals(current);
    let previous_totals = stats::totals(previous);
    let products = stats::product_stats(current);

    // Staleness is judged across the whole fetched span, with the window
    // end standing in for "now": a creator active only in the previous
    // window has gone quiet.
    let span: Vec<Order> = current.iter().chain(previous.iter()).cloned().collect();
    let span_stats = stats::creator_stats(&span);
    let stale = match span_stats.get(&creator_id) {
        Some(own) => kpi::is_stale(own, window.to, thresholds),
        None => true,
    };

    CreatorDashboard {
        creator_id,
        window,
        average_order_value: kpi::average_order_value(totals.gmv, totals.completed_orders),
        completion_rate: kpi::completion_rate(totals.completed_orders, totals.orders),
        gmv_growth_pct: kpi::growth_rate(totals.gmv, previous_totals.gmv),
        top_products: leaderboard(&products),
        daily_series: timeseries::daily_buckets(current, window.from, window.to),
        stale,
        pending_payout_total,
        totals,
    }
}

/// A brand's view across the creators selling its products.
#[derive(Debug, Clone, Serialize)]
pub struct BrandDashboard {
    pub brand_id: Uuid,
    pub window: PeriodWindow,
    pub totals: OrderTotals,
    pub average_order_value: f64,
    pub completion_rate: f64,
    pub gmv_growth_pct: Option<f64>,
    pub top_creators: Vec<EntityLeader>,
    /// Share of the brand's GMV driven by its single largest creator.
    pub creator_concentration_pct: f64,
    pub dependency_risk: bool,
    pub daily_series: Vec<DailyBucket>,
}

/// Fetch and assemble a brand's dashboard.
pub async fn brand_dashboard(
    pool: &PgPool,
    brand_id: Uuid,
    window: PeriodWindow,
) -> Result<BrandDashboard, AppError> {
    let span_from = window.previous().from;
    let rows = fetch_span_for_brand(pool, brand_id, span_from, window.to).await?;

    let (current, previous) = partition(&rows, &window);
    let mut dashboard = build_brand(
        brand_id,
        &current,
        &previous,
        window,
        &KpiThresholds::default(),
    );
    attach_creator_names(pool, &mut dashboard.top_creators).await?;
    Ok(dashboard)
}

/// Derive a brand dashboard from in-memory snapshots of that brand's orders.
fn build_brand(
    brand_id: Uuid,
    current: &[Order],
    previous: &[Order],
    window: PeriodWindow,
    thresholds: &KpiThresholds,
) -> BrandDashboard {
    let totals = stats::totals(current);
    let previous_totals = stats::totals(previous);
    let creators = stats::creator_stats(current);
    let concentration = kpi::concentration_ratio(&creators, 1);

    BrandDashboard {
        brand_id,
        window,
        average_order_value: kpi::average_order_value(totals.gmv, totals.completed_orders),
        completion_rate: kpi::completion_rate(totals.completed_orders, totals.orders),
        gmv_growth_pct: kpi::growth_rate(totals.gmv, previous_totals.gmv),
        top_creators: leaderboard(&creators),
        creator_concentration_pct: concentration,
        dependency_risk: kpi::is_dependency_risk(concentration, thresholds),
        daily_series: timeseries::daily_buckets(current, window.from, window.to),
        totals,
    }
}

/// Top entities by GMV, deterministic ordering.
fn leaderboard(stats: &std::collections::HashMap<Uuid, EntityStats>) -> Vec<EntityLeader> {
    kpi::rank_by_gmv(stats)
        .into_iter()
        .take(TOP_N)
        .map(EntityLeader::from)
        .collect()
}

/// Amounts of completed orders, for the median KPI.
fn completed_amounts(orders: &[Order]) -> Vec<i64> {
    use crate::models::order::OrderStatus;
    orders
        .iter()
        .filter(|o| o.status == Some(OrderStatus::Completed))
        .map(|o| o.amount.unwrap_or(0))
        .collect()
}

/// Partition a fetched span into owned current/previous snapshots.
fn partition(rows: &[Order], window: &PeriodWindow) -> (Vec<Order>, Vec<Order>) {
    let (current, previous) = timeseries::split_by_window(rows, window);
    (
        current.into_iter().cloned().collect(),
        previous.into_iter().cloned().collect(),
    )
}

/// Fill in creator display names for a leaderboard.
async fn attach_creator_names(
    pool: &PgPool,
    leaders: &mut [EntityLeader],
) -> Result<(), AppError> {
    attach_names(pool, leaders, "SELECT id, display_name FROM creators WHERE id = ANY($1)").await
}

/// Fill in product names for a leaderboard.
async fn attach_product_names(
    pool: &PgPool,
    leaders: &mut [EntityLeader],
) -> Result<(), AppError> {
    attach_names(pool, leaders, "SELECT id, name FROM products WHERE id = ANY($1)").await
}

async fn attach_names(
    pool: &PgPool,
    leaders: &mut [EntityLeader],
    sql: &str,
) -> Result<(), AppError> {
    if leaders.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = leaders.iter().map(|l| l.entity_id).collect();
    let rows: Vec<(Uuid, String)> = sqlx::query_as(sql).bind(&ids).fetch_all(pool).await?;
    let names: std::collections::HashMap<Uuid, String> = rows.into_iter().collect();
    for leader in leaders {
        leader.name = names.get(&leader.entity_id).cloned();
    }
    Ok(())
}

/// Fetch one creator's orders inside `[from, to]`.
async fn fetch_span_for_creator(
    pool: &PgPool,
    creator_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Order>, AppError> {
    let rows = sqlx::query_as::<_, Order>(
        r#"
        SELECT * FROM orders
        WHERE creator_id = $1 AND created_at >= $2 AND created_at <= $3
        ORDER BY created_at ASC
        "#,
    )
    .bind(creator_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch one brand's orders inside `[from, to]`.
async fn fetch_span_for_brand(
    pool: &PgPool,
    brand_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Order>, AppError> {
    let rows = sqlx::query_as::<_, Order>(
        r#"
        SELECT * FROM orders
        WHERE brand_id = $1 AND created_at >= $2 AND created_at <= $3
        ORDER BY created_at ASC
        "#,
    )
    .bind(brand_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Pending creator payout total for one creator.
async fn pending_payouts_for_creator(pool: &PgPool, creator_id: Uuid) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(creator_amount), 0)
        FROM payouts
        WHERE status = 'pending' AND creator_id = $1
        "#,
    )
    .bind(creator_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
