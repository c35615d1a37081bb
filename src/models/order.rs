//! Order model, the row shape every dashboard aggregation consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Settlement status of an order.
///
/// The column is nullable: rows imported before status tracking carry no
/// status at all. Aggregation counts those toward totals only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
    Pending,
    Cancelled,
}

/// Order row.
///
/// `amount` is in minor currency units. `creator_id` / `product_id` /
/// `brand_id` are nullable: an order placed outside an affiliate link has no
/// creator, direct-sold inventory may have no product row yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub amount: Option<i64>,
    pub status: Option<OrderStatus>,
    pub creator_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    #[validate(length(min = 1, max = 64))]
    pub order_number: String,
    #[validate(range(min = 0))]
    pub amount: Option<i64>,
    pub status: Option<OrderStatus>,
    pub creator_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
}

/// Request body for a status update. Single-record, last write wins.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn null_status_deserializes_to_none() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "order_number": "SR-0001",
            "amount": null,
            "status": null,
            "creator_id": null,
            "product_id": null,
            "brand_id": null,
            "created_at": "2026-08-01T00:00:00Z",
            "updated_at": "2026-08-01T00:00:00Z",
        }))
        .unwrap();
        assert!(order.status.is_none());
        assert!(order.amount.is_none());
    }

    #[test]
    fn create_order_rejects_negative_amount() {
        let input = CreateOrder {
            order_number: "SR-0002".to_string(),
            amount: Some(-500),
            status: None,
            creator_id: None,
            product_id: None,
            brand_id: None,
        };
        assert!(input.validate().is_err());
    }
}
