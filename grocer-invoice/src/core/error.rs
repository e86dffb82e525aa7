//! Invoice pipeline errors
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | `InvalidOrderData` | pricing | missing/invalid fields, stored totals inconsistent |
//! | `DiscountCalculation` | pricing | coupon result outside `[0, base]` or overflowed |
//! | `RenderingFailure` | renderer, save | document construction or output failed |
//! | `OrderNotFound` | service | repository has no such order |
//! | `Storage` | service | repository failure |
//! | `InvalidConfig` | setup | configuration cannot be used |

use grocer_pdf::PdfError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::repository::StorageError;

#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Order is missing required data or its stored figures do not add up
    #[error("Invalid order data: {0}")]
    InvalidOrderData(String),

    /// Document construction or output failed; no partial output is kept
    #[error("Rendering failure: {0}")]
    RenderingFailure(String),

    /// Coupon rule produced a discount outside `[0, base]`, or none at all
    #[error("Discount calculation error: coupon {code} on base {base}: {detail}")]
    DiscountCalculation {
        code: String,
        base: Decimal,
        detail: String,
    },

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InvoiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOrderData(msg.into())
    }
}

impl From<PdfError> for InvoiceError {
    fn from(err: PdfError) -> Self {
        Self::RenderingFailure(err.to_string())
    }
}

impl From<std::io::Error> for InvoiceError {
    fn from(err: std::io::Error) -> Self {
        Self::RenderingFailure(err.to_string())
    }
}

pub type InvoiceResult<T> = Result<T, InvoiceError>;
