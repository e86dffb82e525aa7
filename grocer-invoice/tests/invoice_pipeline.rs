//! End-to-end: redb storage → pricing → PDF on disk

use std::str::FromStr;

use chrono::NaiveDate;
use grocer_invoice::{
    InvoiceError, InvoiceRenderer, InvoiceService, OrderStorage, PricingEngine,
};
use grocer_pdf::shown_text;
use rust_decimal::Decimal;
use shared::{Coupon, Order, OrderItem};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn placed_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

fn service_with(orders: &[Order]) -> InvoiceService<OrderStorage> {
    let storage = OrderStorage::open_in_memory().unwrap();
    let txn = storage.begin_write().unwrap();
    for order in orders {
        storage.store_order(&txn, order).unwrap();
    }
    txn.commit().unwrap();

    InvoiceService::new(
        storage,
        PricingEngine::new(),
        InvoiceRenderer::new("Fresh Grocer", "€"),
    )
}

/// Draft order priced the way the ordering workflow does it
fn finalized(order: Order) -> Order {
    PricingEngine::new().finalize(order).unwrap()
}

#[test]
fn plain_order_invoice() {
    let order = finalized(
        Order::new(42, placed_at()).with_item(OrderItem::new(1, "Apple", dec("2.0"), dec("10.00"))),
    );
    let service = service_with(&[order]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoice-42.pdf");

    service.save(42, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.trim_ascii_end().ends_with(b"%%EOF"));

    let text = shown_text(&bytes).unwrap();
    for expected in [
        "Order #42",
        "Order date: 2024-03-01 09:15",
        "Apple",
        "2.00 kg",
        "Subtotal: 20.00 €",
        "VAT (20%): 4.00 €",
        "TOTAL: 24.00 €",
    ] {
        assert!(text.iter().any(|t| t == expected), "missing {:?} in {:?}", expected, text);
    }
    assert!(!text.iter().any(|t| t.starts_with("Coupon discount")));
    assert!(!text.iter().any(|t| t.starts_with("Loyalty discount")));
}

#[test]
fn coupon_order_invoice() {
    let order = finalized(
        Order::new(43, placed_at())
            .with_item(OrderItem::new(1, "Apple", dec("2.0"), dec("10.00")))
            .with_coupon(Coupon::percentage("SAVE10", dec("10"))),
    );
    assert_eq!(order.total_after_tax, dec("21.60"));

    let text = shown_text(&service_with(&[order]).generate(43).unwrap()).unwrap();

    assert!(text.iter().any(|t| t == "Coupon discount (SAVE10): -2.40 €"));
    assert!(text.iter().any(|t| t == "TOTAL: 21.60 €"));
}

#[test]
fn recorded_coupon_discount_takes_precedence() {
    // Coupon value changed after checkout; the recorded 3.00 stands
    let mut order = Order::new(44, placed_at())
        .with_item(OrderItem::new(1, "Apple", dec("2.0"), dec("10.00")))
        .with_coupon(Coupon::fixed_amount("WELCOME", dec("5.00")));
    order.subtotal_before_tax = dec("20.00");
    order.vat = dec("4.00");
    order.total_after_tax = dec("21.00");

    let service = service_with(&[order]);
    let storage = service.repository();
    let txn = storage.begin_write().unwrap();
    storage
        .record_coupon_discount(&txn, 44, dec("3.00"))
        .unwrap();
    txn.commit().unwrap();

    let text = shown_text(&service.generate(44).unwrap()).unwrap();

    assert!(text.iter().any(|t| t == "Coupon discount (WELCOME): -3.00 €"));
    assert!(text.iter().any(|t| t == "TOTAL: 21.00 €"));
}

#[test]
fn tampered_total_rejected_and_nothing_written() {
    let mut order = finalized(
        Order::new(45, placed_at()).with_item(OrderItem::new(1, "Pear", dec("1.5"), dec("4.00"))),
    );
    order.total_after_tax += dec("0.05");

    let service = service_with(&[order]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoice-45.pdf");

    let result = service.save(45, &path);

    assert!(matches!(result, Err(InvoiceError::InvalidOrderData(_))));
    assert!(!path.exists());
}

#[test]
fn unknown_order() {
    let result = service_with(&[]).generate(99);
    assert!(matches!(result, Err(InvoiceError::OrderNotFound(99))));
}

#[test]
fn oversized_coupon_reported() {
    let mut order = Order::new(46, placed_at())
        .with_item(OrderItem::new(1, "Apple", dec("1"), dec("1.00")))
        .with_coupon(Coupon::fixed_amount("HUGE", dec("50.00")));
    order.subtotal_before_tax = dec("1.00");
    order.vat = dec("0.20");
    order.total_after_tax = dec("0.00");

    let result = service_with(&[order]).generate(46);

    assert!(matches!(
        result,
        Err(InvoiceError::DiscountCalculation { ref code, .. }) if code == "HUGE"
    ));
}

#[test]
fn same_order_same_bytes() {
    let order = finalized(
        Order::new(47, placed_at())
            .with_item(OrderItem::new(1, "Apple", dec("2.0"), dec("10.00")))
            .with_item(OrderItem::new(2, "Café beans", dec("0.25"), dec("32.00")))
            .with_loyalty_discount(dec("1.00")),
    );
    let service = service_with(&[order]);

    assert_eq!(service.generate(47).unwrap(), service.generate(47).unwrap());

    let text = shown_text(&service.generate(47).unwrap()).unwrap();
    assert!(text.iter().any(|t| t == "Café beans"));
    assert!(text.iter().any(|t| t == "Loyalty discount: -1.00 €"));
}

#[test]
fn overflowing_order_rejected() {
    let mut order = Order::new(48, placed_at()).with_item(OrderItem::new(
        1,
        "Bulk",
        dec("100000000000000000"),
        dec("100000000000000"),
    ));
    order.subtotal_before_tax = dec("1.00");

    let result = service_with(&[order]).generate(48);

    assert!(matches!(result, Err(InvoiceError::InvalidOrderData(_))));
}
