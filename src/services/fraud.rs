//! Fraud flag service: creation, review queue, and severity summary.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::fraud_flag::{CreateFraudFlag, FraudFlag, FraudSeverity};
use crate::models::pagination::{PagedResult, Pagination};

/// Unreviewed flag counts grouped by severity, shown on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FraudSummary {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
}

impl FraudSummary {
    pub fn total(&self) -> i64 {
        self.low + self.medium + self.high
    }
}

/// Intermediate row for the conditional aggregation.
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    low: i64,
    medium: i64,
    high: i64,
}

/// Count unreviewed flags per severity in a single query.
pub async fn summary(pool: &PgPool) -> Result<FraudSummary, AppError> {
    let row = sqlx::query_as::<_, SummaryRow>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN severity = 'low'    THEN 1 ELSE 0 END), 0) AS low,
            COALESCE(SUM(CASE WHEN severity = 'medium' THEN 1 ELSE 0 END), 0) AS medium,
            COALESCE(SUM(CASE WHEN severity = 'high'   THEN 1 ELSE 0 END), 0) AS high
        FROM fraud_flags
        WHERE reviewed = false
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(FraudSummary {
        low: row.low,
        medium: row.medium,
        high: row.high,
    })
}

/// Create a fraud flag on an order.
pub async fn create(pool: &PgPool, input: &CreateFraudFlag) -> Result<FraudFlag, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let flag = sqlx::query_as::<_, FraudFlag>(
        r#"
        INSERT INTO fraud_flags (order_id, severity, reason)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(input.order_id)
    .bind(input.severity)
    .bind(&input.reason)
    .fetch_one(pool)
    .await?;

    tracing::info!(order_id = %input.order_id, severity = ?input.severity, "Fraud flag raised");
    Ok(flag)
}

/// Filters for listing fraud flags.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FraudFilters {
    pub severity: Option<FraudSeverity>,
    pub reviewed: Option<bool>,
    pub order_id: Option<Uuid>,
}

/// List fraud flags with filters and pagination, newest first.
pub async fn list(
    pool: &PgPool,
    filters: &FraudFilters,
    pagination: &Pagination,
) -> Result<PagedResult<FraudFlag>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.severity.is_some() {
        param_index += 1;
        conditions.push(format!("severity = ${param_index}"));
    }
    if filters.reviewed.is_some() {
        param_index += 1;
        conditions.push(format!("reviewed = ${param_index}"));
    }
    if filters.order_id.is_some() {
        param_index += 1;
        conditions.push(format!("order_id = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM fraud_flags {where_clause}");
    let data_sql = format!(
        "SELECT * FROM fraud_flags {where_clause} ORDER BY created_at DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, FraudFlag>(&data_sql);

    if let Some(ref severity) = filters.severity {
        count_query = count_query.bind(severity);
        data_query = data_query.bind(severity);
    }
    if let Some(ref reviewed) = filters.reviewed {
        count_query = count_query.bind(reviewed);
        data_query = data_query.bind(reviewed);
    }
    if let Some(ref order_id) = filters.order_id {
        count_query = count_query.bind(order_id);
        data_query = data_query.bind(order_id);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Mark a flag as reviewed. Single-record update, idempotent on re-review.
pub async fn mark_reviewed(pool: &PgPool, id: Uuid) -> Result<FraudFlag, AppError> {
    sqlx::query_as::<_, FraudFlag>(
        "UPDATE fraud_flags SET reviewed = true, reviewed_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Fraud flag not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_total_sums_severities() {
        let summary = FraudSummary {
            low: 3,
            medium: 2,
            high: 1,
        };
        assert_eq!(summary.total(), 6);
        assert_eq!(FraudSummary::default().total(), 0);
    }
}
