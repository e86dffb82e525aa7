use std::path::PathBuf;

use grocer_pdf::is_win_ansi;

use super::error::{InvoiceError, InvoiceResult};

/// Application configuration
///
/// # Environment variables
///
/// Every setting can be overridden from the environment (or `.env`):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory |
/// | DATABASE_FILE | orders.redb | order database, relative to WORK_DIR |
/// | MERCHANT_NAME | Fresh Grocer | invoice header |
/// | CURRENCY_SUFFIX | € | printed after every amount |
/// | LOG_LEVEL | info | log level |
/// | LOG_DIR | (unset) | daily rolling log directory |
/// | ENVIRONMENT | development | `production` switches logs to JSON |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/var/lib/grocer MERCHANT_NAME="Corner Market" grocer-invoice list
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and generated files
    pub work_dir: String,
    /// Database file name inside `work_dir`
    pub database_file: String,
    /// Merchant name printed in the invoice header
    pub merchant_name: String,
    /// Currency suffix appended to every amount
    pub currency_suffix: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_file: std::env::var("DATABASE_FILE")
                .unwrap_or_else(|_| "orders.redb".into()),
            merchant_name: std::env::var("MERCHANT_NAME")
                .unwrap_or_else(|_| "Fresh Grocer".into()),
            currency_suffix: std::env::var("CURRENCY_SUFFIX").unwrap_or_else(|_| "€".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory
    ///
    /// Mostly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Full path of the order database
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Reject settings the invoice cannot print faithfully
    ///
    /// The merchant name and currency suffix go onto every invoice in the
    /// built-in Helvetica fonts, which only cover WinAnsi.
    pub fn validate(&self) -> InvoiceResult<()> {
        for (var, value) in [
            ("MERCHANT_NAME", &self.merchant_name),
            ("CURRENCY_SUFFIX", &self.currency_suffix),
        ] {
            if !is_win_ansi(value) {
                return Err(InvoiceError::InvalidConfig(format!(
                    "{} {:?} contains characters outside WinAnsi",
                    var, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_joins_work_dir() {
        let mut config = Config::with_overrides("/tmp/grocer");
        config.database_file = "orders.redb".into();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/grocer/orders.redb"));
    }

    #[test]
    fn test_validate_accepts_win_ansi_text() {
        let mut config = Config::with_overrides("/tmp/grocer");
        config.merchant_name = "Café Müller".into();
        for suffix in ["€", "£", ""] {
            config.currency_suffix = suffix.into();
            assert!(config.validate().is_ok(), "{:?} rejected", suffix);
        }
    }

    #[test]
    fn test_validate_rejects_unprintable_currency() {
        let mut config = Config::with_overrides("/tmp/grocer");
        config.merchant_name = "Fresh Grocer".into();
        config.currency_suffix = "₺".into();

        match config.validate() {
            Err(InvoiceError::InvalidConfig(msg)) => assert!(msg.contains("CURRENCY_SUFFIX")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unprintable_merchant() {
        let mut config = Config::with_overrides("/tmp/grocer");
        config.merchant_name = "八百屋".into();
        config.currency_suffix = "€".into();

        assert!(matches!(config.validate(), Err(InvoiceError::InvalidConfig(_))));
    }

    #[test]
    fn test_is_production() {
        let mut config = Config::with_overrides("/tmp/grocer");
        config.environment = "production".into();
        assert!(config.is_production());
        config.environment = "development".into();
        assert!(!config.is_production());
    }
}
