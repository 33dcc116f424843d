//! CLI error types
//!
//! Every subsystem error reaching the CLI is wrapped with a CLI code and
//! printed once by `main`.

use std::fmt;
use std::io;

use crate::executor::SearchError;
use crate::ingest::IngestError;
use crate::materialize::MaterializeError;
use crate::observability::Severity;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing, unreadable or invalid
    ConfigError,
    /// stdin/stdout or input file
    IoError,
    /// Command-line value rejected
    InvalidArgument,
    /// Corpus could not be loaded or saved
    CorpusError,
    /// Runtime or server failed to start
    BootFailed,
    /// Search, rebuild or ingest failed
    CommandFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "UNITS_CLI_CONFIG_ERROR",
            Self::IoError => "UNITS_CLI_IO_ERROR",
            Self::InvalidArgument => "UNITS_CLI_INVALID_ARGUMENT",
            Self::CorpusError => "UNITS_CLI_CORPUS_ERROR",
            Self::BootFailed => "UNITS_CLI_BOOT_FAILED",
            Self::CommandFailed => "UNITS_CLI_COMMAND_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidArgument | Self::CommandFailed => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::CorpusError, e.to_string())
    }
}

impl From<SearchError> for CliError {
    fn from(e: SearchError) -> Self {
        let code = if e.is_client_error() {
            CliErrorCode::InvalidArgument
        } else {
            CliErrorCode::CommandFailed
        };
        Self::new(code, e.to_string())
    }
}

impl From<MaterializeError> for CliError {
    fn from(e: MaterializeError) -> Self {
        Self::new(CliErrorCode::CommandFailed, e.to_string())
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::new(CliErrorCode::CommandFailed, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
