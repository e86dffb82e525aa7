//! redb-based storage for orders, recorded coupon discounts and users

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use rust_decimal::Decimal;
use shared::{Order, UserCredential};
use thiserror::Error;

/// Orders table: key = order id, value = JSON
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Coupon discount recorded when an order was placed: key = order id,
/// value = decimal string
const COUPON_DISCOUNTS_TABLE: TableDefinition<i64, &str> =
    TableDefinition::new("coupon_discounts");

/// Users table: key = username, value = JSON
const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(COUPON_DISCOUNTS_TABLE)?;
            let _ = write_txn.open_table(USERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Orders ==========

    /// Store (or replace) an order
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id, value.as_slice())?;
        Ok(())
    }

    /// Get an order by ID
    pub fn get_order(&self, id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(id)? {
            Some(guard) => {
                let order: Order = serde_json::from_slice(guard.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Get orders by ascending ID (paginated)
    pub fn list_orders(&self, offset: usize, limit: usize) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()?.skip(offset).take(limit) {
            let (_, guard) = result?;
            let order: Order = serde_json::from_slice(guard.value())?;
            orders.push(order);
        }
        Ok(orders)
    }

    /// Delete an order and its recorded coupon discount
    ///
    /// Returns whether the order existed.
    pub fn delete_order(&self, txn: &WriteTransaction, id: i64) -> StorageResult<bool> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let existed = table.remove(id)?.is_some();

        let mut discounts = txn.open_table(COUPON_DISCOUNTS_TABLE)?;
        discounts.remove(id)?;

        Ok(existed)
    }

    // ========== Coupon Discounts ==========

    /// Record the coupon discount granted when an order was placed
    pub fn record_coupon_discount(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
        amount: Decimal,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(COUPON_DISCOUNTS_TABLE)?;
        let value = amount.to_string();
        table.insert(order_id, value.as_str())?;
        Ok(())
    }

    /// Recorded coupon discount for an order, zero if none
    pub fn coupon_discount(&self, order_id: i64) -> StorageResult<Decimal> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUPON_DISCOUNTS_TABLE)?;

        match table.get(order_id)? {
            Some(guard) => Decimal::from_str(guard.value()).map_err(|e| {
                StorageError::Corrupt(format!(
                    "coupon discount for order {}: {}",
                    order_id, e
                ))
            }),
            None => Ok(Decimal::ZERO),
        }
    }

    // ========== Users ==========

    pub fn store_user(&self, txn: &WriteTransaction, user: &UserCredential) -> StorageResult<()> {
        let mut table = txn.open_table(USERS_TABLE)?;
        let value = serde_json::to_vec(user)?;
        table.insert(user.username.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_user(&self, username: &str) -> StorageResult<Option<UserCredential>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;

        match table.get(username)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        let discounts = read_txn.open_table(COUPON_DISCOUNTS_TABLE)?;
        let users = read_txn.open_table(USERS_TABLE)?;

        Ok(StorageStats {
            order_count: orders.len()?,
            coupon_discount_count: discounts.len()?,
            user_count: users.len()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StorageStats {
    pub order_count: u64,
    pub coupon_discount_count: u64,
    pub user_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::OrderItem;

    fn order(id: i64) -> Order {
        let time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        Order::new(id, time).with_item(OrderItem::new(
            1,
            "Apple",
            Decimal::new(2, 0),
            Decimal::new(1000, 2),
        ))
    }

    #[test]
    fn test_order_crud() {
        let storage = OrderStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(42)).unwrap();
        txn.commit().unwrap();

        let retrieved = storage.get_order(42).unwrap().unwrap();
        assert_eq!(retrieved, order(42));
        assert!(storage.get_order(7).unwrap().is_none());

        let txn = storage.begin_write().unwrap();
        assert!(storage.delete_order(&txn, 42).unwrap());
        assert!(!storage.delete_order(&txn, 42).unwrap());
        txn.commit().unwrap();

        assert!(storage.get_order(42).unwrap().is_none());
    }

    #[test]
    fn test_uncommitted_write_not_visible() {
        let storage = OrderStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(1)).unwrap();
        txn.abort().unwrap();

        assert!(storage.get_order(1).unwrap().is_none());
    }

    #[test]
    fn test_list_orders_paginated() {
        let storage = OrderStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        for id in [3, 1, 2, 5, 4] {
            storage.store_order(&txn, &order(id)).unwrap();
        }
        txn.commit().unwrap();

        let ids: Vec<i64> = storage
            .list_orders(1, 3)
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert!(storage.list_orders(10, 3).unwrap().is_empty());
    }

    #[test]
    fn test_coupon_discount_defaults_to_zero() {
        let storage = OrderStorage::open_in_memory().unwrap();
        assert_eq!(storage.coupon_discount(42).unwrap(), Decimal::ZERO);

        let txn = storage.begin_write().unwrap();
        storage
            .record_coupon_discount(&txn, 42, Decimal::new(240, 2))
            .unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.coupon_discount(42).unwrap(), Decimal::new(240, 2));
    }

    #[test]
    fn test_delete_order_removes_discount() {
        let storage = OrderStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.store_order(&txn, &order(42)).unwrap();
        storage
            .record_coupon_discount(&txn, 42, Decimal::new(240, 2))
            .unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        storage.delete_order(&txn, 42).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.coupon_discount(42).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_users_and_stats() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let user = UserCredential {
            username: "alice".into(),
            salt: "abc".into(),
            password_hash: "00".into(),
        };

        let txn = storage.begin_write().unwrap();
        storage.store_user(&txn, &user).unwrap();
        storage.store_order(&txn, &order(1)).unwrap();
        storage.store_order(&txn, &order(2)).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_user("alice").unwrap(), Some(user));
        assert!(storage.get_user("bob").unwrap().is_none());

        let stats = storage.get_stats().unwrap();
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.coupon_discount_count, 0);
        assert_eq!(stats.user_count, 1);
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.redb");

        {
            let storage = OrderStorage::open(&path).unwrap();
            let txn = storage.begin_write().unwrap();
            storage.store_order(&txn, &order(9)).unwrap();
            txn.commit().unwrap();
        }

        let storage = OrderStorage::open(&path).unwrap();
        assert_eq!(storage.get_order(9).unwrap().unwrap().id, 9);
    }
}
