//! Order service: listing with filters, creation, and status updates.
//!
//! Writes are single-record with no optimistic-concurrency check: the last
//! status update wins, matching how the dashboards issue them.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::order::{CreateOrder, Order, OrderStatus};
use crate::models::pagination::{PagedResult, Pagination};

/// Filters for listing orders.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    pub creator_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Substring match on order_number.
    pub search: Option<String>,
}

/// List orders with filters and pagination, newest first.
pub async fn list(
    pool: &PgPool,
    filters: &OrderFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Order>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.status.is_some() {
        param_index += 1;
        conditions.push(format!("status = ${param_index}"));
    }
    if filters.creator_id.is_some() {
        param_index += 1;
        conditions.push(format!("creator_id = ${param_index}"));
    }
    if filters.product_id.is_some() {
        param_index += 1;
        conditions.push(format!("product_id = ${param_index}"));
    }
    if filters.brand_id.is_some() {
        param_index += 1;
        conditions.push(format!("brand_id = ${param_index}"));
    }
    if filters.from.is_some() {
        param_index += 1;
        conditions.push(format!("created_at >= ${param_index}"));
    }
    if filters.to.is_some() {
        param_index += 1;
        conditions.push(format!("created_at <= ${param_index}"));
    }
    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!("order_number ILIKE ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM orders {where_clause}");
    let data_sql = format!(
        "SELECT * FROM orders {where_clause} ORDER BY created_at DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, Order>(&data_sql);

    // Bind parameters in the same order for both queries
    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(ref status) = filters.status {
        bind_both!(status);
    }
    if let Some(ref creator_id) = filters.creator_id {
        bind_both!(creator_id);
    }
    if let Some(ref product_id) = filters.product_id {
        bind_both!(product_id);
    }
    if let Some(ref brand_id) = filters.brand_id {
        bind_both!(brand_id);
    }
    if let Some(ref from) = filters.from {
        bind_both!(from);
    }
    if let Some(ref to) = filters.to {
        bind_both!(to);
    }
    if let Some(ref search) = filters.search {
        let pattern = format!("%{search}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Find an order by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Order, AppError> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

/// Create an order.
pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (order_number, amount, status, creator_id, product_id, brand_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&input.order_number)
    .bind(input.amount)
    .bind(input.status)
    .bind(input.creator_id)
    .bind(input.product_id)
    .bind(input.brand_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::Conflict(
            format!("Order '{}' already exists", input.order_number),
        ),
        _ => AppError::Database(e),
    })?;

    Ok(order)
}

/// Update an order's status. Single-record, last write wins.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: OrderStatus,
) -> Result<Order, AppError> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    tracing::info!(order_id = %id, status = ?status, "Order status updated");
    Ok(order)
}

/// Fetch every order created inside `[from, to]`, the snapshot the dashboard
/// aggregations run over.
pub async fn fetch_window(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Order>, AppError> {
    let rows = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE created_at >= $1 AND created_at <= $2 ORDER BY created_at ASC",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
