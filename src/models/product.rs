//! Product model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Product row. `price` is the listed price in minor currency units; the
/// amount actually paid lives on the order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub price: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    pub brand_id: Uuid,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i64,
}
