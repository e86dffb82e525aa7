//! Data models
//!
//! Persisted as JSON by the order repository. All IDs are `i64`.

pub mod coupon;
pub mod order;
pub mod user;

// Re-exports
pub use coupon::*;
pub use order::*;
pub use user::*;
