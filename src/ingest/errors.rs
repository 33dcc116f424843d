//! Ingestion error types
//!
//! Error codes:
//! - UNITS_INGEST_IO (ERROR)
//! - UNITS_INGEST_MALFORMED (WARN)
//!
//! A malformed item rejects that item only; an I/O failure aborts the pass.

use std::fmt;

use crate::observability::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestErrorCode {
    /// Input could not be read
    UnitsIngestIo,
    /// One input line is not a valid scraped item
    UnitsIngestMalformed,
}

impl IngestErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            IngestErrorCode::UnitsIngestIo => "UNITS_INGEST_IO",
            IngestErrorCode::UnitsIngestMalformed => "UNITS_INGEST_MALFORMED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IngestErrorCode::UnitsIngestIo => Severity::Error,
            IngestErrorCode::UnitsIngestMalformed => Severity::Warn,
        }
    }
}

impl fmt::Display for IngestErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
pub struct IngestError {
    code: IngestErrorCode,
    message: String,
    /// 1-based input line, if known
    line: Option<usize>,
}

impl IngestError {
    pub fn io(err: std::io::Error) -> Self {
        Self {
            code: IngestErrorCode::UnitsIngestIo,
            message: err.to_string(),
            line: None,
        }
    }

    pub fn malformed(line: usize, err: serde_json::Error) -> Self {
        Self {
            code: IngestErrorCode::UnitsIngestMalformed,
            message: format!("line {}: {}", line, err),
            line: Some(line),
        }
    }

    /// Parsed, but a field value is unusable
    pub fn invalid(line: usize, message: impl fmt::Display) -> Self {
        Self {
            code: IngestErrorCode::UnitsIngestMalformed,
            message: format!("line {}: {}", line, message),
            line: Some(line),
        }
    }

    pub fn code(&self) -> IngestErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for IngestError {
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

impl std::error::Error for IngestError {}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::io(err)
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
