//! Server configuration.
//!
//! Every field has a default, so a configuration file only needs the keys it
//! wants to change. Files are TOML, YAML, or JSON, picked by extension.
//!
//! ```toml
//! name = "HelloMCP"
//! max_message_size = 1048576
//! shutdown_timeout_ms = 2000
//!
//! [logging]
//! level = "debug"
//! structured = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::MAX_MESSAGE_SIZE;

/// Default grace period for an in-flight request during shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name reported in `initialize`
    pub name: String,
    /// Server version reported in `initialize`
    pub version: String,
    /// Largest accepted inbound message in bytes
    pub max_message_size: usize,
    /// How long `stop` waits for the in-flight request, in milliseconds
    pub shutdown_timeout_ms: u64,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: crate::SERVER_NAME.to_string(),
            version: crate::SERVER_VERSION.to_string(),
            max_message_size: MAX_MESSAGE_SIZE,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub structured: bool,
    /// Where log records go
    pub output: LogOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
            output: LogOutput::Stderr,
        }
    }
}

/// Log destination. Stdout is reserved for protocol traffic and is never
/// an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard error
    #[default]
    Stderr,
    /// Logging disabled
    None,
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported file format
    #[error("Unsupported configuration file format. Use .toml, .yaml, .yml, or .json")]
    UnsupportedFormat,

    /// Configuration parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] config::ConfigError),

    /// A value parsed but is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ServerConfig {
    /// Start building a configuration from defaults.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from a file (TOML, YAML, or JSON).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use hellomcp_server::ServerConfig;
    ///
    /// let config = ServerConfig::from_file("hellomcp.toml")?;
    /// # Ok::<(), hellomcp_server::ConfigError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, has an unknown extension,
    /// does not parse, or holds out-of-range values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        use config::{Config, File, FileFormat};

        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let format = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml" | "yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => return Err(ConfigError::UnsupportedFormat),
        };

        let config = Config::builder()
            .add_source(File::new(
                path.to_str().ok_or(ConfigError::UnsupportedFormat)?,
                format,
            ))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_size == 0 {
            return Err(ConfigError::Invalid(
                "max_message_size must be greater than zero".into(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".into()));
        }
        Ok(())
    }

    /// Shutdown grace period as a [`Duration`].
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Builder for [`ServerConfig`]
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the server name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the server version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the inbound message size limit.
    #[must_use]
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.max_message_size = bytes;
        self
    }

    /// Set the shutdown grace period.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the default log filter.
    #[must_use]
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Emit JSON log lines.
    #[must_use]
    pub fn structured_logs(mut self, structured: bool) -> Self {
        self.config.logging.structured = structured;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(extension: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.name, crate::SERVER_NAME);
        assert_eq!(config.max_message_size, MAX_MESSAGE_SIZE);
        assert_eq!(config.shutdown_timeout(), DEFAULT_SHUTDOWN_TIMEOUT);
        assert_eq!(config.logging.output, LogOutput::Stderr);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let file = write_config(
            "toml",
            "max_message_size = 2048\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_message_size, 2048);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.structured);
        assert_eq!(config.name, crate::SERVER_NAME);
    }

    #[test]
    fn test_json_config() {
        let file = write_config(
            "json",
            r#"{"name": "custom", "shutdown_timeout_ms": 250, "logging": {"output": "none"}}"#,
        );
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.name, "custom");
        assert_eq!(config.shutdown_timeout(), Duration::from_millis(250));
        assert_eq!(config.logging.output, LogOutput::None);
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        assert!(matches!(
            ServerConfig::from_file("/definitely/not/here.toml"),
            Err(ConfigError::FileNotFound(_))
        ));

        let file = write_config("ini", "name = x");
        assert!(matches!(
            ServerConfig::from_file(file.path()),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_zero_message_size_rejected() {
        let file = write_config("toml", "max_message_size = 0\n");
        assert!(matches!(
            ServerConfig::from_file(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .name("HelloMCP")
            .version("1.0.0")
            .max_message_size(512)
            .shutdown_timeout(Duration::from_millis(100))
            .log_level("warn")
            .structured_logs(true)
            .build();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.max_message_size, 512);
        assert_eq!(config.shutdown_timeout_ms, 100);
        assert!(config.logging.structured);
    }
}
