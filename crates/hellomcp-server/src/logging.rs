//! Logging initialization.
//!
//! Stdout carries the protocol, so every log record goes to stderr.
//! `RUST_LOG` takes precedence over the configured level when set.
//!
//! ```rust,no_run
//! use hellomcp_server::LoggingConfig;
//!
//! LoggingConfig::default().init()?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogOutput, LoggingConfig};

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is not a valid filter directive or a
    /// global subscriber is already installed.
    pub fn init(&self) -> io::Result<()> {
        if self.output == LogOutput::None {
            return Ok(());
        }

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?,
        };
        let subscriber = tracing_subscriber::registry().with(filter);

        if self.structured {
            subscriber
                .with(fmt::layer().json().with_writer(io::stderr))
                .try_init()
                .map_err(|e| io::Error::other(e.to_string()))
        } else {
            subscriber
                .with(fmt::layer().with_writer(io::stderr))
                .try_init()
                .map_err(|e| io::Error::other(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_logging_is_a_no_op() {
        let config = LoggingConfig {
            output: LogOutput::None,
            level: "not a [valid filter".into(),
            ..Default::default()
        };
        assert!(config.init().is_ok());
    }
}
