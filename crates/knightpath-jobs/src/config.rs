//! Service configuration, loaded from TOML.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings shared by request intake, the worker pool and the store.
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```toml
/// queue_name = "knightpath-queue"
/// partition_key = "KnightPath"
/// workers = 2
/// poll_interval_ms = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name of the job queue, used in log lines.
    pub queue_name: String,
    /// Partition every result row is stored under.
    pub partition_key: String,
    /// Number of worker threads.
    pub workers: usize,
    /// How long an idle worker blocks on the queue before re-checking
    /// for cancellation.
    pub poll_interval_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            queue_name: "knightpath-queue".to_string(),
            partition_key: "KnightPath".to_string(),
            workers: 2,
            poll_interval_ms: 50,
        }
    }
}

impl ServiceConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Reject settings no worker pool can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be at least 1".into()));
        }
        if self.partition_key.is_empty() {
            return Err(ConfigError::Invalid("partition_key must not be empty".into()));
        }
        Ok(())
    }

    /// [`poll_interval_ms`](Self::poll_interval_ms) as a `Duration`.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Errors that can occur when loading a [`ServiceConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The document is not valid TOML or has fields of the wrong type.
    Parse(toml::de::Error),
    /// The values parse but cannot be used.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "config: cannot read {}: {source}", path.display()),
            Self::Parse(e) => write!(f, "config: {e}"),
            Self::Invalid(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let c = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(c, ServiceConfig::default());
        assert_eq!(c.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn partial_override() {
        let c = ServiceConfig::from_toml_str("workers = 8\nqueue_name = \"jobs\"").unwrap();
        assert_eq!(c.workers, 8);
        assert_eq!(c.queue_name, "jobs");
        assert_eq!(c.partition_key, "KnightPath");
    }

    #[test]
    fn zero_workers_rejected() {
        let err = ServiceConfig::from_toml_str("workers = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = ServiceConfig::from_toml_str("workers = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ServiceConfig::load("/nonexistent/knightpath.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/knightpath.toml"));
    }
}
