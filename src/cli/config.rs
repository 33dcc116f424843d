//! Configuration file
//!
//! ```json
//! {
//!   "corpus_path": "./corpus.json",
//!   "port": 8000,
//!   "default_limit": 20,
//!   "materialize_cron": "0 */6 * * *",
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `corpus_path` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::executor::MAX_LIMIT;
use crate::http_server::HttpServerConfig;
use crate::materialize::{MaterializeSchedule, DEFAULT_SCHEDULE};
use crate::observability::{log_event, Event, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Corpus snapshot file (required)
    pub corpus_path: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Page size when a request names none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Hard page size ceiling, at most 100
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_materialize_cron")]
    pub materialize_cron: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_limit() -> usize {
    20
}
fn default_max_limit() -> usize {
    MAX_LIMIT
}
fn default_materialize_cron() -> String {
    DEFAULT_SCHEDULE.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// A config with every optional field at its default
    pub fn new(corpus_path: impl Into<String>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            materialize_cron: default_materialize_cron(),
            log_level: default_log_level(),
        }
    }

    /// Loads and validates a config file
    pub fn load(path: &Path) -> CliResult<Self> {
        let result = Self::read(path).and_then(|config| {
            config.validate()?;
            Ok(config)
        });

        let shown = path.display().to_string();
        match &result {
            Ok(_) => log_event(Event::ConfigLoaded, &[("path", shown.as_str())]),
            Err(err) => log_event(
                Event::ConfigInvalid,
                &[("path", shown.as_str()), ("reason", err.message())],
            ),
        }
        result
    }

    fn read(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.corpus_path.trim().is_empty() {
            return Err(CliError::config_error("corpus_path must not be empty"));
        }

        if self.max_limit == 0 || self.max_limit > MAX_LIMIT {
            return Err(CliError::config_error(format!(
                "max_limit must be between 1 and {}, got {}",
                MAX_LIMIT, self.max_limit
            )));
        }

        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(CliError::config_error(format!(
                "default_limit must be between 1 and max_limit ({}), got {}",
                self.max_limit, self.default_limit
            )));
        }

        MaterializeSchedule::parse(&self.materialize_cron)
            .map_err(|e| CliError::config_error(e.message().to_string()))?;

        self.min_severity()?;
        Ok(())
    }

    pub fn min_severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!("Invalid log_level: '{}'", self.log_level))
        })
    }

    pub fn corpus_path(&self) -> PathBuf {
        PathBuf::from(&self.corpus_path)
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}
