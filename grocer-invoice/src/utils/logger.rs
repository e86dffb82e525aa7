//! Logging Infrastructure
//!
//! One subscriber per process. `RUST_LOG` wins over the configured level;
//! production writes JSON lines, anything else the compact text format.
//! With a log directory set, output goes to a daily rolling file there
//! instead of stderr.

use tracing_subscriber::EnvFilter;

use crate::core::Config;

const LOG_FILE_PREFIX: &str = "grocer-invoice.log";

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber described by `config`
///
/// Creates the log directory when missing. A subscriber that is already
/// installed is left in place.
pub fn init_logging(config: &Config) -> std::io::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(false);

    let installed = match config.log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let builder = builder.with_ansi(false).with_writer(appender);
            if config.is_production() {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        None => {
            let builder = builder.with_writer(std::io::stderr);
            if config.is_production() {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
    };

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
    Ok(())
}
