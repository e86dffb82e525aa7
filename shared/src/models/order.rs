//! Order Model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coupon::Coupon;
use crate::money::round_money;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Order item
///
/// `unit_price` is the price captured when the order was placed; later
/// product price changes never touch it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    /// Product reference
    pub product_id: i64,
    /// Resolved product display name, if the caller looked it up
    #[serde(default)]
    pub product_name: Option<String>,
    /// Quantity in kilograms
    pub quantity_kg: Decimal,
    /// Unit price (per kg) in currency unit
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn new(
        product_id: i64,
        product_name: impl Into<String>,
        quantity_kg: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            product_id,
            product_name: Some(product_name.into()),
            quantity_kg,
            unit_price,
        }
    }

    /// Name shown on documents, falling back to the product reference
    pub fn display_name(&self) -> String {
        match self.product_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Product #{}", self.product_id),
        }
    }

    /// quantity × unit price, rounded to 2 places; `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.quantity_kg
            .checked_mul(self.unit_price)
            .map(round_money)
    }
}

/// Order entity
///
/// The monetary fields are the figures persisted when the order was
/// placed. Consumers read them; nothing downstream rewrites them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Time the order was placed (required for invoicing)
    #[serde(default)]
    pub order_time: Option<NaiveDateTime>,
    /// Requested delivery time
    #[serde(default)]
    pub delivery_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Subtotal before tax in currency unit
    #[serde(default)]
    pub subtotal_before_tax: Decimal,
    /// VAT amount in currency unit
    #[serde(default)]
    pub vat: Decimal,
    /// Loyalty discount amount in currency unit
    #[serde(default)]
    pub loyalty_discount: Decimal,
    #[serde(default)]
    pub coupon: Option<Coupon>,
    /// Total after tax and discounts in currency unit
    #[serde(default)]
    pub total_after_tax: Decimal,
}

impl Order {
    /// Create an empty draft order placed at `order_time`
    pub fn new(id: i64, order_time: NaiveDateTime) -> Self {
        Self {
            id,
            items: Vec::new(),
            order_time: Some(order_time),
            delivery_time: None,
            status: OrderStatus::Created,
            subtotal_before_tax: Decimal::ZERO,
            vat: Decimal::ZERO,
            loyalty_discount: Decimal::ZERO,
            coupon: None,
            total_after_tax: Decimal::ZERO,
        }
    }

    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_delivery_time(mut self, delivery_time: NaiveDateTime) -> Self {
        self.delivery_time = Some(delivery_time);
        self
    }

    pub fn with_loyalty_discount(mut self, amount: Decimal) -> Self {
        self.loyalty_discount = amount;
        self
    }

    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupon = Some(coupon);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem::new(1, "Apple", dec("2.0"), dec("10.00"));
        assert_eq!(item.line_total(), Some(dec("20.00")));

        let item = OrderItem::new(2, "Pear", dec("0.333"), dec("4.99"));
        // 1.66167 -> 1.66
        assert_eq!(item.line_total(), Some(dec("1.66")));
    }

    #[test]
    fn test_line_total_overflow_is_none() {
        let item = OrderItem::new(
            1,
            "Bulk",
            dec("100000000000000000"),
            dec("100000000000000"),
        );
        assert_eq!(item.line_total(), None);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut item = OrderItem::new(7, "", dec("1"), dec("1"));
        assert_eq!(item.display_name(), "Product #7");
        item.product_name = None;
        assert_eq!(item.display_name(), "Product #7");
        item.product_name = Some("Leek".to_string());
        assert_eq!(item.display_name(), "Leek");
    }

    #[test]
    fn test_deserialize_minimal_order() {
        let json = r#"{
            "id": 42,
            "items": [{"product_id": 1, "quantity_kg": 2.0, "unit_price": "10.00"}],
            "order_time": "2024-03-01T09:15:00"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, 42);
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.items[0].product_name, None);
        assert_eq!(order.items[0].quantity_kg, dec("2"));
        assert!(order.delivery_time.is_none());
        assert!(order.coupon.is_none());
        assert_eq!(order.total_after_tax, Decimal::ZERO);
    }

    #[test]
    fn test_status_serde() {
        let s = serde_json::to_string(&OrderStatus::Dispatched).unwrap();
        assert_eq!(s, "\"DISPATCHED\"");
    }
}
