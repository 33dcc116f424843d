//! Materializer error types
//!
//! Error codes:
//! - UNITS_SECTION_CYCLE (ERROR)
//! - UNITS_MATERIALIZE_STORE_FAILED (ERROR)
//! - UNITS_INVALID_SCHEDULE (ERROR)

use std::fmt;

use crate::observability::Severity;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeErrorCode {
    /// A section is its own ancestor
    UnitsSectionCycle,
    UnitsMaterializeStoreFailed,
    /// Cron pattern rejected
    UnitsInvalidSchedule,
}

impl MaterializeErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            MaterializeErrorCode::UnitsSectionCycle => "UNITS_SECTION_CYCLE",
            MaterializeErrorCode::UnitsMaterializeStoreFailed => "UNITS_MATERIALIZE_STORE_FAILED",
            MaterializeErrorCode::UnitsInvalidSchedule => "UNITS_INVALID_SCHEDULE",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for MaterializeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug)]
pub struct MaterializeError {
    code: MaterializeErrorCode,
    message: String,
    section_id: Option<u64>,
}

impl MaterializeError {
    pub fn cycle(section_id: u64) -> Self {
        Self {
            code: MaterializeErrorCode::UnitsSectionCycle,
            message: format!("section {} is its own ancestor", section_id),
            section_id: Some(section_id),
        }
    }

    pub fn store_failed(err: StoreError) -> Self {
        Self {
            code: MaterializeErrorCode::UnitsMaterializeStoreFailed,
            message: err.to_string(),
            section_id: None,
        }
    }

    pub fn invalid_schedule(pattern: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: MaterializeErrorCode::UnitsInvalidSchedule,
            message: format!("invalid cron pattern '{}': {}", pattern, reason),
            section_id: None,
        }
    }

    pub fn code(&self) -> MaterializeErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Section at which a cycle was detected
    pub fn section_id(&self) -> Option<u64> {
        self.section_id
    }
}

impl fmt::Display for MaterializeError {
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

impl std::error::Error for MaterializeError {}

impl From<StoreError> for MaterializeError {
    fn from(err: StoreError) -> Self {
        MaterializeError::store_failed(err)
    }
}

pub type MaterializeResult<T> = Result<T, MaterializeError>;
