//! Tracing subscriber initialisation
//!
//! `RUST_LOG` takes precedence over the configured level so operators can raise
//! verbosity for a single module without touching the config file.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Build the env filter, falling back to the configured level
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(&config.log_level));

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_file(true)
                .with_line_number(true);

            registry.with(fmt_layer).try_init()?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true);

            registry.with(fmt_layer).try_init()?;
        }
        LogFormat::Compact => {
            let fmt_layer = tracing_subscriber::fmt::layer().compact().with_target(false);

            registry.with(fmt_layer).try_init()?;
        }
    }

    info!(
        logging.format = ?config.log_format,
        logging.level = %config.log_level,
        "Structured logging initialized"
    );

    Ok(())
}
