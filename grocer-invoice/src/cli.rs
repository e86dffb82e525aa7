//! Maintenance command line

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shared::Order;
use tracing::info;

use crate::auth;
use crate::core::Config;
use crate::invoice::{InvoiceRenderer, InvoiceService};
use crate::pricing::PricingEngine;
use crate::repository::OrderStorage;

#[derive(Debug, Parser)]
#[command(name = "grocer-invoice", version, about = "Order invoicing tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import orders from a JSON file (one order or an array)
    Import {
        file: PathBuf,
        /// Compute and stamp subtotal, VAT and total before storing
        #[arg(long)]
        finalize: bool,
    },
    /// List stored orders
    List {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Render an order's invoice to a PDF file
    Render {
        #[arg(long)]
        order_id: i64,
        /// Output path, defaults to WORK_DIR/invoice-<id>.pdf
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the text lines of an order's invoice
    Preview {
        #[arg(long)]
        order_id: i64,
    },
    /// Delete an order and its recorded coupon discount
    Delete {
        #[arg(long)]
        order_id: i64,
    },
    /// Record the coupon discount granted at checkout
    RecordCoupon {
        #[arg(long)]
        order_id: i64,
        #[arg(long)]
        amount: Decimal,
    },
    /// Create or replace an operator account
    AddUser {
        #[arg(long)]
        username: String,
        #[arg(long, env = "GROCER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check operator credentials
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "GROCER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show storage statistics
    Stats,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Many(Vec<Order>),
    One(Box<Order>),
}

/// Execute a command against the configured database
pub fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let storage = OrderStorage::open(config.database_path())
        .with_context(|| format!("opening {}", config.database_path().display()))?;

    match cli.command {
        Command::Import { file, finalize } => {
            let data = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let orders = match serde_json::from_slice::<ImportFile>(&data)? {
                ImportFile::Many(orders) => orders,
                ImportFile::One(order) => vec![*order],
            };

            let engine = PricingEngine::new();
            let txn = storage.begin_write()?;
            for order in &orders {
                let order = if finalize {
                    engine
                        .finalize(order.clone())
                        .with_context(|| format!("finalizing order {}", order.id))?
                } else {
                    order.clone()
                };
                storage.store_order(&txn, &order)?;
            }
            txn.commit()?;

            info!(count = orders.len(), "orders imported");
            println!("Imported {} order(s)", orders.len());
        }

        Command::List { offset, limit } => {
            for order in storage.list_orders(offset, limit)? {
                let placed = order
                    .order_time
                    .map(|t| crate::invoice::format::format_datetime(&t))
                    .unwrap_or_else(|| "-".into());
                println!(
                    "#{:<6} {:<16} {:<10} {:>3} item(s) {:>10}",
                    order.id,
                    placed,
                    order.status.as_str(),
                    order.items.len(),
                    crate::invoice::format::format_money(
                        order.total_after_tax,
                        &config.currency_suffix
                    ),
                );
            }
        }

        Command::Render { order_id, out } => {
            let path = out.unwrap_or_else(|| {
                PathBuf::from(&config.work_dir).join(format!("invoice-{}.pdf", order_id))
            });
            let saved = service(storage, config).save(order_id, &path)?;
            println!("Invoice written to {}", saved.display());
        }

        Command::Preview { order_id } => {
            let bytes = service(storage, config).generate(order_id)?;
            for line in grocer_pdf::shown_text(&bytes)? {
                println!("{}", line);
            }
        }

        Command::Delete { order_id } => {
            let txn = storage.begin_write()?;
            if !storage.delete_order(&txn, order_id)? {
                bail!("order {} not found", order_id);
            }
            txn.commit()?;
            info!(order_id, "order deleted");
            println!("Deleted order #{}", order_id);
        }

        Command::RecordCoupon { order_id, amount } => {
            if amount < Decimal::ZERO {
                bail!("coupon discount must be non-negative, got {}", amount);
            }
            if storage.get_order(order_id)?.is_none() {
                bail!("order {} not found", order_id);
            }
            let txn = storage.begin_write()?;
            storage.record_coupon_discount(&txn, order_id, amount)?;
            txn.commit()?;
            println!("Recorded coupon discount {} for order #{}", amount, order_id);
        }

        Command::AddUser { username, password } => {
            if password.is_empty() {
                bail!("password must not be empty");
            }
            let credential = auth::new_credential(&username, &password);
            let txn = storage.begin_write()?;
            storage.store_user(&txn, &credential)?;
            txn.commit()?;
            println!("User {} saved", username);
        }

        Command::Login { username, password } => {
            if !auth::authenticate(&storage, &username, &password)? {
                bail!("invalid username or password");
            }
            println!("Welcome, {}", username);
        }

        Command::Stats => {
            let stats = storage.get_stats()?;
            println!("orders:           {}", stats.order_count);
            println!("coupon discounts: {}", stats.coupon_discount_count);
            println!("users:            {}", stats.user_count);
        }
    }

    Ok(())
}

fn service(storage: OrderStorage, config: &Config) -> InvoiceService<OrderStorage> {
    InvoiceService::new(
        storage,
        PricingEngine::new(),
        InvoiceRenderer::from_config(config),
    )
}
