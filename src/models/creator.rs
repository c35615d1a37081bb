//! Creator (influencer) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Creator row: the referring party whose affiliate link drove an order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Creator {
    pub id: Uuid,
    pub handle: String,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCreator {
    #[validate(length(min = 1, max = 64))]
    pub handle: String,
    #[validate(length(min = 1, max = 128))]
    pub display_name: String,
}
