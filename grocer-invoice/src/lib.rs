//! Grocer Invoice - order pricing and PDF invoices
//!
//! # Overview
//!
//! - **Pricing** (`pricing`): line totals, 20% VAT, loyalty and coupon
//!   discounts; verifies the figures stored on an order
//! - **Invoices** (`invoice`): single-page PDF layout and the generation
//!   service
//! - **Repository** (`repository`): embedded redb order storage
//! - **Auth** (`auth`): operator credentials
//!
//! # Module layout
//!
//! ```text
//! grocer-invoice/src/
//! ├── core/          # config, errors
//! ├── pricing/       # pricing engine
//! ├── invoice/       # renderer, formatting, service
//! ├── repository/    # redb storage
//! ├── auth.rs        # credentials
//! ├── cli.rs         # maintenance commands
//! └── utils/         # logging
//! ```

pub mod auth;
pub mod cli;
pub mod core;
pub mod invoice;
pub mod pricing;
pub mod repository;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, InvoiceError, InvoiceResult};
pub use invoice::{InvoiceRenderer, InvoiceService};
pub use pricing::{PriceBreakdown, PricedLine, PricedOrder, PricingEngine, Quote};
pub use repository::{OrderRepository, OrderStorage, StorageError};

pub use utils::logger::init_logging;

/// Load `.env`, read and validate the configuration, create the working
/// directory and start logging
pub fn setup_environment() -> anyhow::Result<Config> {
    use anyhow::Context;

    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.validate()?;
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("creating work dir {}", config.work_dir))?;
    init_logging(&config).context("initializing logging")?;

    tracing::debug!(work_dir = %config.work_dir, environment = %config.environment, "environment ready");
    Ok(config)
}
