//! Business logic: pure aggregation modules plus the sqlx-backed services
//! that feed them.

pub mod catalog;
pub mod dashboard;
pub mod fraud;
pub mod kpi;
pub mod order;
pub mod payout;
pub mod snapshot;
pub mod stats;
pub mod timeseries;
