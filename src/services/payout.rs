//! Payout service: GMV split computation and payout row lifecycle.
//!
//! A payout distributes a completed order's amount among creator, platform,
//! and brand. Shares are computed in basis points with floor division; the
//! brand takes the exact remainder so the three shares always sum to the
//! order amount.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::order::OrderStatus;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::payout::{Payout, PayoutStatus};

/// Split policy in basis points. Platform policy: creator 10%, platform 5%,
/// brand keeps the remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutSplit {
    pub creator_bps: u32,
    pub platform_bps: u32,
}

impl Default for PayoutSplit {
    fn default() -> Self {
        Self {
            creator_bps: 1000,
            platform_bps: 500,
        }
    }
}

/// Computed shares of one order amount.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PayoutShares {
    pub creator: i64,
    pub platform: i64,
    pub brand: i64,
}

/// Split a non-negative amount per the policy. Creator and platform cuts are
/// floored; the brand share is the remainder, so
/// `creator + platform + brand == amount` exactly.
pub fn split_amount(amount: i64, split: &PayoutSplit) -> PayoutShares {
    let creator = amount * i64::from(split.creator_bps) / 10_000;
    let platform = amount * i64::from(split.platform_bps) / 10_000;
    PayoutShares {
        creator,
        platform,
        brand: amount - creator - platform,
    }
}

/// Generate the payout for a completed order.
pub async fn generate(pool: &PgPool, order_id: Uuid, split: &PayoutSplit) -> Result<Payout, AppError> {
    let order = super::order::find_by_id(pool, order_id).await?;

    if order.status != Some(OrderStatus::Completed) {
        return Err(AppError::Validation(
            "Payouts can only be generated for completed orders".to_string(),
        ));
    }

    let shares = split_amount(order.amount.unwrap_or(0), split);

    let payout = sqlx::query_as::<_, Payout>(
        r#"
        INSERT INTO payouts (order_id, creator_id, creator_amount, platform_amount, brand_amount, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        RETURNING *
        "#,
    )
    .bind(order_id)
    .bind(order.creator_id)
    .bind(shares.creator)
    .bind(shares.platform)
    .bind(shares.brand)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Payout for order '{order_id}' already exists"))
        }
        _ => AppError::Database(e),
    })?;

    tracing::info!(order_id = %order_id, payout_id = %payout.id, "Payout generated");
    Ok(payout)
}

/// Filters for listing payouts.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PayoutFilters {
    pub status: Option<PayoutStatus>,
    pub creator_id: Option<Uuid>,
}

/// List payouts with filters and pagination, newest first.
pub async fn list(
    pool: &PgPool,
    filters: &PayoutFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Payout>, AppError> {
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

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM payouts {where_clause}");
    let data_sql = format!(
        "SELECT * FROM payouts {where_clause} ORDER BY created_at DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, Payout>(&data_sql);

    if let Some(ref status) = filters.status {
        count_query = count_query.bind(status);
        data_query = data_query.bind(status);
    }
    if let Some(ref creator_id) = filters.creator_id {
        count_query = count_query.bind(creator_id);
        data_query = data_query.bind(creator_id);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Mark a pending payout as paid, stamping `paid_at`.
pub async fn mark_paid(pool: &PgPool, id: Uuid) -> Result<Payout, AppError> {
    let updated = sqlx::query_as::<_, Payout>(
        "UPDATE payouts SET status = 'paid', paid_at = NOW() WHERE id = $1 AND status = 'pending' RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(payout) => Ok(payout),
        None => {
            // Distinguish "missing" from "already paid".
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM payouts WHERE id = $1)",
            )
            .bind(id)
            .fetch_one(pool)
            .await?;
            if exists {
                Err(AppError::Conflict("Payout is already paid".to_string()))
            } else {
                Err(AppError::NotFound("Payout not found".to_string()))
            }
        }
    }
}

/// Total creator amount still awaiting payment.
pub async fn pending_creator_total(pool: &PgPool) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(creator_amount), 0) FROM payouts WHERE status = 'pending'",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_split_of_round_amount() {
        let shares = split_amount(10000, &PayoutSplit::default());
        // 10% creator, 5% platform, remainder to brand.
        assert_eq!(
            shares,
            PayoutShares {
                creator: 1000,
                platform: 500,
                brand: 8500,
            }
        );
    }

    #[test]
    fn odd_amount_remainder_goes_to_brand() {
        let shares = split_amount(9999, &PayoutSplit::default());
        // floor(999.9) = 999, floor(499.95) = 499, brand takes the rest.
        assert_eq!(shares.creator, 999);
        assert_eq!(shares.platform, 499);
        assert_eq!(shares.brand, 8501);
        assert_eq!(shares.creator + shares.platform + shares.brand, 9999);
    }

    #[test]
    fn zero_amount_splits_to_zero() {
        let shares = split_amount(0, &PayoutSplit::default());
        assert_eq!(shares.creator + shares.platform + shares.brand, 0);
    }

    #[test]
    fn shares_always_sum_to_amount() {
        let split = PayoutSplit {
            creator_bps: 1500,
            platform_bps: 333,
        };
        for amount in [1, 7, 99, 12345, 1_000_001] {
            let shares = split_amount(amount, &split);
            assert_eq!(shares.creator + shares.platform + shares.brand, amount);
        }
    }
}
