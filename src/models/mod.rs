//! Database models and DTOs for all domain entities.

pub mod brand;
pub mod creator;
pub mod fraud_flag;
pub mod order;
pub mod pagination;
pub mod payout;
pub mod product;
