//! Tracing setup for the analytics service.
//!
//! `RUST_LOG` always wins; otherwise the filter comes from the configured
//! level, which itself defaults per environment.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

fn log_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        value: config.log_level.clone(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config)?)
        .with_target(true)
        .with_ansi(config.ansi)
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn rust_log_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn config(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
            ansi: false,
        }
    }

    #[test]
    fn configured_level_applies_when_rust_log_is_unset() {
        let _lock = rust_log_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let filter = log_filter(&config("debug")).expect("level parses");
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn rust_log_overrides_the_configured_level() {
        let _lock = rust_log_guard().lock().expect("env mutex poisoned");
        env::set_var("RUST_LOG", "warn");
        let filter = log_filter(&config("debug")).expect("filter builds");
        assert_eq!(filter.to_string(), "warn");
        env::remove_var("RUST_LOG");
    }

    #[test]
    fn malformed_filter_directives_are_rejected() {
        let _lock = rust_log_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let err = log_filter(&config("foo=bar=baz")).expect_err("directive rejected");
        assert!(matches!(err, TelemetryError::Filter { ref value, .. } if value == "foo=bar=baz"));
    }
}
