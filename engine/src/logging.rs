//! Tracing subscriber setup for hosts that embed a Templ.
//!
//! The engine only emits `tracing` events; installing a subscriber is left to
//! the embedding process. [`LogFormat::Human`] writes readable lines,
//! [`LogFormat::Json`] writes one JSON object per event. `RUST_LOG` overrides
//! the configured level when set.

use crate::config::TemplConfig;
use crate::error::TemplError;
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = TemplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(TemplError::Logging(format!("unknown log format '{other}'"))),
        }
    }
}

/// Initialise the global tracing subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been set. Use
/// [`try_init_logging`] where that can happen (tests, embedding hosts).
pub fn init_logging(format: LogFormat, level: &str) {
    if let Err(e) = try_init_logging(format, level) {
        panic!("{e}");
    }
}

/// Like [`init_logging`] but reports an already-installed subscriber as an error.
pub fn try_init_logging(format: LogFormat, level: &str) -> Result<(), TemplError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init(),
    };
    result.map_err(|e| TemplError::Logging(e.to_string()))
}

/// Install a subscriber from the `log_format` and `log_level` of `config`.
pub fn init_logging_from(config: &TemplConfig) -> Result<(), TemplError> {
    let format = config.log_format.parse()?;
    try_init_logging(format, &config.log_level)
}
