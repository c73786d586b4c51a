//! Global `tracing` subscriber for the binaries. Events go to stderr so that
//! stdout carries only command output.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, TelemetryConfig};

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "log filter '{directive}' is not a valid directive")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "could not install the log subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` when set and valid, otherwise the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| filter_for(&config.log_level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Full => builder.with_target(true).with_ansi(true).try_init(),
        LogFormat::Compact => builder
            .compact()
            .with_target(false)
            .with_ansi(false)
            .try_init(),
    };

    installed.map_err(TelemetryError::AlreadyInstalled)
}

fn filter_for(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::Filter {
        directive: directive.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_level_and_target_directives() {
        assert!(filter_for("debug").is_ok());
        assert!(filter_for("safety_score=trace,warn").is_ok());
    }

    #[test]
    fn rejects_unknown_level_in_directive() {
        match filter_for("safety_score=loudest") {
            Err(TelemetryError::Filter { directive, .. }) => {
                assert_eq!(directive, "safety_score=loudest");
            }
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}
