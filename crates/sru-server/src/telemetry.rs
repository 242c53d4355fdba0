//! Process-wide logging for a host embedding [`SruServer`](crate::SruServer).
//!
//! The server only emits `tracing` events. A host that has no subscriber of
//! its own calls [`initialise`] once at startup with the same [`Config`] it
//! hands to the server; events then go to stderr in the configured format.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use sru_config::{Config, LogFormat};
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

/// Describes the subscriber that owns the global slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
    filter: String,
}

impl TelemetryHandle {
    /// Output format of the installed subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }

    /// Filter expression the installed subscriber was built with.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression is invalid.
    #[error("invalid log filter '{expression}': {message}")]
    Filter {
        /// The rejected expression.
        expression: String,
        /// Parser message.
        message: String,
    },
    /// A subscriber not installed through [`initialise`] owns the global slot.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber described by `config`.
///
/// Only the first successful call installs anything. Later calls still
/// check their own filter expression and then return the handle of the
/// subscriber already installed, even if their configuration differs.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when `config.log_filter()` does not
/// parse and [`TelemetryError::Subscriber`] when some other subscriber was
/// installed first.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    INSTALLED
        .get_or_try_init(|| {
            install(filter, config.log_format())?;
            Ok(TelemetryHandle {
                format: config.log_format(),
                filter: config.log_filter().to_owned(),
            })
        })
        .cloned()
}

/// Parses a filter expression, rejecting any malformed directive.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for malformed expressions.
pub fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        expression: expression.to_owned(),
        message: error.to_string(),
    })
}

fn install(filter: EnvFilter, format: LogFormat) -> Result<(), TelemetryError> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
