//! Pricing Engine Module
//!
//! Line totals, VAT, loyalty and coupon discounts for stored orders.

pub mod engine;

pub use engine::{
    PriceBreakdown, PricedLine, PricedOrder, PricingEngine, Quote, VAT_PERCENT_LABEL, VAT_RATE,
};
