//! Shared types for the Grocer workspace
//!
//! Domain models and money helpers used by both the invoice pipeline
//! and the maintenance tooling.

pub mod models;
pub mod money;

// Re-exports
pub use models::{Coupon, DiscountType, Order, OrderItem, OrderStatus, UserCredential};
pub use money::{DECIMAL_PLACES, MONEY_TOLERANCE, checked_sum, round_money, within_tolerance};
pub use rust_decimal::Decimal;
