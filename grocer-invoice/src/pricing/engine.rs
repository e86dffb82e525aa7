//! Order Pricing Engine
//!
//! Derives and verifies the money figures of an order:
//! - Line totals (quantity × unit price, 2 places)
//! - Subtotal and VAT (fixed 20% of subtotal)
//! - Loyalty discount (stored on the order)
//! - Coupon discount, computed on the tax-inclusive amount
//!
//! Calculation order:
//! 1. subtotal = Σ line totals
//! 2. vat = subtotal × 20%
//! 3. coupon = coupon rule applied to (subtotal + vat)
//! 4. total = subtotal + vat - loyalty - coupon
//!
//! Printed figures come from the stored order. They are checked against
//! a recomputation and any drift beyond 0.01 rejects the order. Every
//! step uses checked arithmetic; amounts too large to represent are
//! reported as invalid data.

use rust_decimal::prelude::*;
use shared::{Coupon, Order, OrderItem, checked_sum, round_money, within_tolerance};
use tracing::{debug, instrument};

use crate::core::{InvoiceError, InvoiceResult};

/// VAT rate (20%)
pub const VAT_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// VAT rate as printed on documents
pub const VAT_PERCENT_LABEL: &str = "20%";

/// One priced order line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_name: String,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Verified money breakdown of an order (presentation only)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub loyalty_discount: Decimal,
    /// Coupon discount; zero when no coupon applies
    pub coupon_discount: Decimal,
    /// Code of the applied coupon, if any
    pub coupon_code: Option<String>,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// subtotal + vat - loyalty - coupon == total, within tolerance
    pub fn is_consistent(&self) -> bool {
        self.subtotal
            .checked_add(self.vat)
            .and_then(|v| v.checked_sub(self.loyalty_discount))
            .and_then(|v| v.checked_sub(self.coupon_discount))
            .is_some_and(|expected| within_tolerance(expected, self.total))
    }
}

/// Order together with its verified figures, ready for rendering
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub order: Order,
    pub lines: Vec<PricedLine>,
    pub breakdown: PriceBreakdown,
}

/// Figures computed from scratch for a set of items
#[derive(Debug, Clone)]
pub struct Quote {
    pub lines: Vec<PricedLine>,
    pub breakdown: PriceBreakdown,
}

/// Pricing engine
///
/// Stateless; one instance can be shared by any number of callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute all figures for `items` from scratch
    ///
    /// Used by the ordering workflow when an order is placed, and by
    /// [`PricingEngine::finalize`].
    pub fn quote(
        &self,
        items: &[OrderItem],
        loyalty_discount: Decimal,
        coupon: Option<&Coupon>,
    ) -> InvoiceResult<Quote> {
        let lines = price_lines(items)?;
        let subtotal = sum_lines(&lines)?;
        let vat = vat_for(subtotal)?;
        let base = tax_inclusive(subtotal, vat)?;

        check_loyalty(loyalty_discount, base)?;
        let coupon_discount = coupon_discount(coupon, base, Decimal::ZERO)?;

        let total = base - loyalty_discount - coupon_discount;
        if total < Decimal::ZERO {
            return Err(InvoiceError::invalid(format!(
                "discounts ({} + {}) exceed order value {}",
                loyalty_discount, coupon_discount, base
            )));
        }

        Ok(Quote {
            lines,
            breakdown: PriceBreakdown {
                subtotal,
                vat,
                loyalty_discount,
                coupon_discount,
                coupon_code: coupon.map(|c| c.code.clone()),
                total,
            },
        })
    }

    /// Stamp freshly computed figures onto a draft order
    pub fn finalize(&self, mut order: Order) -> InvoiceResult<Order> {
        require_order_fields(&order)?;
        let quote = self.quote(&order.items, order.loyalty_discount, order.coupon.as_ref())?;

        order.subtotal_before_tax = quote.breakdown.subtotal;
        order.vat = quote.breakdown.vat;
        order.total_after_tax = quote.breakdown.total;
        Ok(order)
    }

    /// Verify a stored order and produce its breakdown
    ///
    /// `recorded_coupon_discount` is the discount the repository recorded
    /// for this order (zero if none). A recorded amount is the historical
    /// figure and takes precedence over re-running the coupon rule.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    pub fn price(
        &self,
        order: &Order,
        recorded_coupon_discount: Decimal,
    ) -> InvoiceResult<PricedOrder> {
        require_order_fields(order)?;

        for (name, value) in [
            ("subtotal", order.subtotal_before_tax),
            ("vat", order.vat),
            ("loyalty discount", order.loyalty_discount),
            ("total", order.total_after_tax),
        ] {
            if value < Decimal::ZERO {
                return Err(InvoiceError::invalid(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        let lines = price_lines(&order.items)?;

        // Stored subtotal vs recomputation from items
        let computed_subtotal = sum_lines(&lines)?;
        require_match("subtotal", order.subtotal_before_tax, computed_subtotal)?;

        // VAT is 20% of the stored subtotal
        require_match("vat", order.vat, vat_for(order.subtotal_before_tax)?)?;

        let base = tax_inclusive(order.subtotal_before_tax, order.vat)?;
        check_loyalty(order.loyalty_discount, base)?;
        let coupon_discount =
            coupon_discount(order.coupon.as_ref(), base, recorded_coupon_discount)?;

        let expected_total = base - order.loyalty_discount - coupon_discount;
        require_match("total", order.total_after_tax, expected_total)?;

        let breakdown = PriceBreakdown {
            subtotal: order.subtotal_before_tax,
            vat: order.vat,
            loyalty_discount: order.loyalty_discount,
            coupon_discount,
            coupon_code: order.coupon.as_ref().map(|c| c.code.clone()),
            total: order.total_after_tax,
        };

        debug!(
            subtotal = %breakdown.subtotal,
            vat = %breakdown.vat,
            loyalty = %breakdown.loyalty_discount,
            coupon = %breakdown.coupon_discount,
            total = %breakdown.total,
            "order priced"
        );

        Ok(PricedOrder {
            order: order.clone(),
            lines,
            breakdown,
        })
    }
}

/// VAT for a subtotal, rounded to 2 places
#[inline]
fn vat_for(subtotal: Decimal) -> InvoiceResult<Decimal> {
    subtotal
        .checked_mul(VAT_RATE)
        .map(round_money)
        .ok_or_else(|| InvoiceError::invalid(format!("subtotal {} too large", subtotal)))
}

fn tax_inclusive(subtotal: Decimal, vat: Decimal) -> InvoiceResult<Decimal> {
    subtotal.checked_add(vat).ok_or_else(|| {
        InvoiceError::invalid(format!("subtotal {} plus vat {} too large", subtotal, vat))
    })
}

fn sum_lines(lines: &[PricedLine]) -> InvoiceResult<Decimal> {
    checked_sum(lines.iter().map(|l| l.line_total))
        .ok_or_else(|| InvoiceError::invalid("sum of line totals too large"))
}

fn require_match(field: &str, stored: Decimal, computed: Decimal) -> InvoiceResult<()> {
    if !within_tolerance(stored, computed) {
        return Err(InvoiceError::invalid(format!(
            "stored {} {} does not match computed {}",
            field, stored, computed
        )));
    }
    Ok(())
}

/// Fields every invoiceable order must carry
fn require_order_fields(order: &Order) -> InvoiceResult<()> {
    if order.order_time.is_none() {
        return Err(InvoiceError::invalid(format!(
            "order {} has no order time",
            order.id
        )));
    }
    if order.items.is_empty() {
        return Err(InvoiceError::invalid(format!("order {} has no items", order.id)));
    }
    Ok(())
}

/// Validate items and compute their line totals
fn price_lines(items: &[OrderItem]) -> InvoiceResult<Vec<PricedLine>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if item.quantity_kg <= Decimal::ZERO {
                return Err(InvoiceError::invalid(format!(
                    "item {} ({}): quantity must be positive, got {}",
                    idx,
                    item.display_name(),
                    item.quantity_kg
                )));
            }
            if item.unit_price <= Decimal::ZERO {
                return Err(InvoiceError::invalid(format!(
                    "item {} ({}): unit price must be positive, got {}",
                    idx,
                    item.display_name(),
                    item.unit_price
                )));
            }
            let line_total = item.line_total().ok_or_else(|| {
                InvoiceError::invalid(format!(
                    "item {} ({}): {} kg × {} is too large",
                    idx,
                    item.display_name(),
                    item.quantity_kg,
                    item.unit_price
                ))
            })?;
            Ok(PricedLine {
                product_name: item.display_name(),
                quantity_kg: item.quantity_kg,
                unit_price: item.unit_price,
                line_total,
            })
        })
        .collect()
}

fn check_loyalty(loyalty_discount: Decimal, base: Decimal) -> InvoiceResult<()> {
    if loyalty_discount < Decimal::ZERO || loyalty_discount > base {
        return Err(InvoiceError::invalid(format!(
            "loyalty discount {} outside [0, {}]",
            loyalty_discount, base
        )));
    }
    Ok(())
}

/// Coupon discount on the tax-inclusive `base`
///
/// Out-of-range results are reported, never clamped.
fn coupon_discount(
    coupon: Option<&Coupon>,
    base: Decimal,
    recorded: Decimal,
) -> InvoiceResult<Decimal> {
    let Some(coupon) = coupon else {
        if !recorded.is_zero() {
            return Err(InvoiceError::invalid(format!(
                "coupon discount {} recorded for an order without a coupon",
                recorded
            )));
        }
        return Ok(Decimal::ZERO);
    };

    let discount = if recorded.is_zero() {
        coupon
            .calculate_discount(base)
            .ok_or_else(|| InvoiceError::DiscountCalculation {
                code: coupon.code.clone(),
                base,
                detail: "rule overflowed".into(),
            })?
    } else {
        recorded
    };

    if discount < Decimal::ZERO || discount > base {
        return Err(InvoiceError::DiscountCalculation {
            code: coupon.code.clone(),
            base,
            detail: format!("produced {}", discount),
        });
    }
    Ok(discount)
}

// ==================== Tests ====================
