//! Value formatting for printed documents
//!
//! These formats are part of the document contract: amounts always carry
//! exactly two decimals, dates are `yyyy-MM-dd HH:mm`.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use shared::round_money;

/// Date format used on invoices
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format an amount: "20.00 €"
pub fn format_money(amount: Decimal, suffix: &str) -> String {
    let value = round_money(amount);
    if suffix.is_empty() {
        format!("{:.2}", value)
    } else {
        format!("{:.2} {}", value, suffix)
    }
}

/// Format a discount with a leading minus sign: "-2.40 €"
pub fn format_discount(amount: Decimal, suffix: &str) -> String {
    format!("-{}", format_money(amount.abs(), suffix))
}

/// Format a quantity with two decimals: "2.00"
pub fn format_quantity(quantity: Decimal) -> String {
    format!("{:.2}", round_money(quantity))
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}
