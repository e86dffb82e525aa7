//! Order repository
//!
//! The invoice service reads orders through [`OrderRepository`]; the
//! redb-backed [`OrderStorage`] is the production implementation.

mod storage;

pub use storage::{OrderStorage, StorageError, StorageResult, StorageStats};

use rust_decimal::Decimal;
use shared::Order;

/// Read access to placed orders
pub trait OrderRepository {
    /// Fetch an order by ID
    fn find_order(&self, id: i64) -> StorageResult<Option<Order>>;

    /// Coupon discount recorded when the order was placed, zero if none
    fn coupon_discount(&self, order_id: i64) -> StorageResult<Decimal>;
}

impl OrderRepository for OrderStorage {
    fn find_order(&self, id: i64) -> StorageResult<Option<Order>> {
        self.get_order(id)
    }

    fn coupon_discount(&self, order_id: i64) -> StorageResult<Decimal> {
        OrderStorage::coupon_discount(self, order_id)
    }
}
