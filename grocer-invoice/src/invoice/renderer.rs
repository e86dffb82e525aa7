//! Invoice renderer
//!
//! Lays out a [`PricedOrder`] on a single A4 page and serializes it as PDF.
//! The renderer prints the figures it is given; all verification happens
//! in the pricing engine.

use std::io::Write;

use grocer_pdf::{Font, PdfDocument, PdfPage, truncate_chars};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::format::{format_datetime, format_discount, format_money, format_quantity};
use crate::core::{Config, InvoiceResult};
use crate::pricing::{PricedLine, PricedOrder, VAT_PERCENT_LABEL};

// Page geometry (points)
const LEFT: f32 = 50.0;
const RIGHT: f32 = 545.0;
const START_Y: f32 = 790.0;
const LINE_HEIGHT: f32 = 18.0;

// Item table columns, all left-aligned
const QTY_X: f32 = 300.0;
const UNIT_X: f32 = 380.0;
const TOTAL_X: f32 = 470.0;
const NAME_MAX_CHARS: usize = 40;

const INVOICE_X: f32 = 450.0;
const SUMMARY_X: f32 = 330.0;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 12.0;

/// Vertical write position, moving down the page
struct Cursor {
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self { y: START_Y }
    }

    /// Current baseline, then advance by `lines`
    fn advance(&mut self, lines: f32) -> f32 {
        let y = self.y;
        self.y -= LINE_HEIGHT * lines;
        y
    }
}

/// Invoice renderer
///
/// Produces one invoice per priced order. Sections, top to bottom:
/// header, item table, totals.
pub struct InvoiceRenderer {
    merchant_name: String,
    currency_suffix: String,
}

impl InvoiceRenderer {
    pub fn new(merchant_name: impl Into<String>, currency_suffix: impl Into<String>) -> Self {
        Self {
            merchant_name: merchant_name.into(),
            currency_suffix: currency_suffix.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.merchant_name, &config.currency_suffix)
    }

    /// Build the document without serializing it
    pub fn compose(&self, priced: &PricedOrder) -> PdfDocument {
        let mut page = PdfPage::a4();
        let mut cursor = Cursor::new();

        self.render_header(&mut page, &mut cursor, priced);
        self.render_items(&mut page, &mut cursor, &priced.lines);
        self.render_totals(&mut page, &mut cursor, priced);

        let mut doc = PdfDocument::new().with_title(format!("Invoice #{}", priced.order.id));
        doc.add_page(page);
        doc
    }

    /// Render an invoice to PDF bytes
    #[instrument(skip(self, priced), fields(order_id = priced.order.id))]
    pub fn render(&self, priced: &PricedOrder) -> InvoiceResult<Vec<u8>> {
        let bytes = self.compose(priced).build()?;
        debug!(bytes = bytes.len(), "invoice rendered");
        Ok(bytes)
    }

    /// Render an invoice into any writer
    ///
    /// On error the writer may hold a partial document; callers writing to
    /// files should go through a temporary file.
    pub fn render_to<W: Write>(&self, priced: &PricedOrder, out: W) -> InvoiceResult<usize> {
        Ok(self.compose(priced).write_to(out)?)
    }

    /// Merchant, title, order number and dates
    fn render_header(&self, page: &mut PdfPage, cursor: &mut Cursor, priced: &PricedOrder) {
        let order = &priced.order;

        let y = cursor.advance(1.5);
        page.text(LEFT, y, Font::HelveticaBold, TITLE_SIZE, &self.merchant_name)
            .text(INVOICE_X, y, Font::HelveticaBold, TITLE_SIZE, "INVOICE");

        let y = cursor.advance(1.0);
        page.text(LEFT, y, Font::Helvetica, BODY_SIZE, &format!("Order #{}", order.id));

        if let Some(order_time) = &order.order_time {
            let y = cursor.advance(1.0);
            page.text(
                LEFT,
                y,
                Font::Helvetica,
                BODY_SIZE,
                &format!("Order date: {}", format_datetime(order_time)),
            );
        }

        if let Some(delivery_time) = &order.delivery_time {
            let y = cursor.advance(1.0);
            page.text(
                LEFT,
                y,
                Font::Helvetica,
                BODY_SIZE,
                &format!("Delivery date: {}", format_datetime(delivery_time)),
            );
        }

        cursor.advance(0.5);
    }

    /// Column headers and one row per line
    fn render_items(&self, page: &mut PdfPage, cursor: &mut Cursor, lines: &[PricedLine]) {
        let y = cursor.advance(1.0);
        page.text(LEFT, y, Font::HelveticaBold, BODY_SIZE, "Product")
            .text(QTY_X, y, Font::HelveticaBold, BODY_SIZE, "Quantity")
            .text(UNIT_X, y, Font::HelveticaBold, BODY_SIZE, "Unit price")
            .text(TOTAL_X, y, Font::HelveticaBold, BODY_SIZE, "Total")
            .hline(LEFT, RIGHT, y - 6.0, 0.75);

        for line in lines {
            self.render_item(page, cursor, line);
        }

        let y = cursor.advance(0.5);
        page.hline(LEFT, RIGHT, y + 6.0, 0.75);
    }

    fn render_item(&self, page: &mut PdfPage, cursor: &mut Cursor, line: &PricedLine) {
        let y = cursor.advance(1.0);
        let suffix = self.currency_suffix.as_str();

        page.text(
            LEFT,
            y,
            Font::Helvetica,
            BODY_SIZE,
            &truncate_chars(&line.product_name, NAME_MAX_CHARS),
        )
        .text(
            QTY_X,
            y,
            Font::Helvetica,
            BODY_SIZE,
            &format!("{} kg", format_quantity(line.quantity_kg)),
        )
        .text(UNIT_X, y, Font::Helvetica, BODY_SIZE, &format_money(line.unit_price, suffix))
        .text(TOTAL_X, y, Font::Helvetica, BODY_SIZE, &format_money(line.line_total, suffix));
    }

    /// Summary lines; discount lines only when they apply
    fn render_totals(&self, page: &mut PdfPage, cursor: &mut Cursor, priced: &PricedOrder) {
        let b = &priced.breakdown;
        let suffix = self.currency_suffix.as_str();

        cursor.advance(0.5);

        let mut line = |page: &mut PdfPage, text: String| {
            let y = cursor.advance(1.0);
            page.text(SUMMARY_X, y, Font::Helvetica, BODY_SIZE, &text);
        };

        line(page, format!("Subtotal: {}", format_money(b.subtotal, suffix)));
        line(
            page,
            format!("VAT ({}): {}", VAT_PERCENT_LABEL, format_money(b.vat, suffix)),
        );

        if b.loyalty_discount > Decimal::ZERO {
            line(
                page,
                format!("Loyalty discount: {}", format_discount(b.loyalty_discount, suffix)),
            );
        }

        if let Some(code) = &b.coupon_code {
            line(
                page,
                format!(
                    "Coupon discount ({}): {}",
                    code,
                    format_discount(b.coupon_discount, suffix)
                ),
            );
        }

        let y = cursor.advance(0.5);
        page.hline(SUMMARY_X, RIGHT, y + 6.0, 0.75);

        let y = cursor.advance(1.0);
        page.text(
            SUMMARY_X,
            y,
            Font::HelveticaBold,
            TOTAL_SIZE,
            &format!("TOTAL: {}", format_money(b.total, suffix)),
        );
    }
}
