//! Coupon Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::round_money;

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

/// Coupon applied to an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coupon {
    /// Unique coupon code (e.g. "SAVE10")
    pub code: String,
    pub discount_type: DiscountType,
    /// Discount value (percentage: 10 = 10%, fixed: 5.00 = 5.00 in currency)
    pub discount_value: Decimal,
}

impl Coupon {
    pub fn percentage(code: impl Into<String>, percent: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_type: DiscountType::Percentage,
            discount_value: percent,
        }
    }

    pub fn fixed_amount(code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_type: DiscountType::FixedAmount,
            discount_value: amount,
        }
    }

    /// Discount this coupon grants on `base_amount`
    ///
    /// The result is rounded to 2 places but otherwise unchecked: a valid
    /// rule yields a value in `[0, base_amount]`, and callers are expected
    /// to reject anything else instead of clamping it. `None` when the
    /// rule overflows.
    pub fn calculate_discount(&self, base_amount: Decimal) -> Option<Decimal> {
        let discount = match self.discount_type {
            DiscountType::Percentage => base_amount
                .checked_mul(self.discount_value)?
                .checked_div(Decimal::ONE_HUNDRED)?,
            DiscountType::FixedAmount => self.discount_value,
        };
        Some(round_money(discount))
    }
}
