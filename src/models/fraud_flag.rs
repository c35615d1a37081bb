//! Fraud flag model: risk annotations attached to orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "fraud_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FraudSeverity {
    Low,
    Medium,
    High,
}

/// Fraud flag row. A flag stays in the unreviewed queue until an operator
/// marks it reviewed; review is a single-record update with no workflow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FraudFlag {
    pub id: Uuid,
    pub order_id: Uuid,
    pub severity: FraudSeverity,
    pub reason: String,
    pub reviewed: bool,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFraudFlag {
    pub order_id: Uuid,
    pub severity: FraudSeverity,
    #[validate(length(min = 1, max = 512))]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FraudSeverity::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn create_flag_requires_reason() {
        let input = CreateFraudFlag {
            order_id: Uuid::nil(),
            severity: FraudSeverity::Low,
            reason: String::new(),
        };
        assert!(input.validate().is_err());
    }
}
