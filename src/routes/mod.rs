//! Route definitions for the SELL RUSH API.

pub mod catalog;
pub mod dashboard;
pub mod fraud;
pub mod health;
pub mod orders;
pub mod payouts;
