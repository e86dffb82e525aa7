//! Invoice generation service
//!
//! Glues the repository, pricing engine and renderer together:
//! fetch order → verify figures → render → (optionally) write to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

use super::renderer::InvoiceRenderer;
use crate::core::{InvoiceError, InvoiceResult};
use crate::pricing::{PricedOrder, PricingEngine};
use crate::repository::OrderRepository;
use shared::Order;

pub struct InvoiceService<R: OrderRepository> {
    repository: R,
    engine: PricingEngine,
    renderer: InvoiceRenderer,
}

impl<R: OrderRepository> InvoiceService<R> {
    pub fn new(repository: R, engine: PricingEngine, renderer: InvoiceRenderer) -> Self {
        Self {
            repository,
            engine,
            renderer,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Fetch and verify an order
    pub fn price(&self, order_id: i64) -> InvoiceResult<PricedOrder> {
        let order = self
            .repository
            .find_order(order_id)?
            .ok_or(InvoiceError::OrderNotFound(order_id))?;
        let recorded = self.repository.coupon_discount(order_id)?;
        self.engine.price(&order, recorded)
    }

    /// Generate the invoice PDF for a stored order
    #[instrument(skip(self))]
    pub fn generate(&self, order_id: i64) -> InvoiceResult<Vec<u8>> {
        let priced = self.price(order_id)?;
        let bytes = self.renderer.render(&priced)?;
        info!(bytes = bytes.len(), "invoice generated");
        Ok(bytes)
    }

    /// Generate the invoice PDF for an order that is not (yet) stored
    ///
    /// No recorded coupon discount exists for such an order; the coupon
    /// rule is applied.
    pub fn generate_for(&self, order: &Order) -> InvoiceResult<Vec<u8>> {
        let priced = self.engine.price(order, rust_decimal::Decimal::ZERO)?;
        self.renderer.render(&priced)
    }

    /// Generate the invoice for `order_id` and write it to `path`
    ///
    /// The document is written to a temporary file next to `path` and
    /// moved into place only once complete; on failure nothing is left at
    /// `path`.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, order_id: i64, path: impl AsRef<Path>) -> InvoiceResult<PathBuf> {
        let path = path.as_ref();
        let bytes = self.generate(order_id)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        if let Err(e) = tmp.write_all(&bytes).and_then(|_| tmp.as_file().sync_all()) {
            warn!(error = %e, "failed to write invoice");
            return Err(e.into());
        }
        tmp.persist(path).map_err(|e| InvoiceError::from(e.error))?;

        info!(bytes = bytes.len(), "invoice saved");
        Ok(path.to_path_buf())
    }
}
