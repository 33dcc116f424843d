//! Search error types
//!
//! Error codes:
//! - UNITS_STORE_FAILED (ERROR)
//! - UNITS_INVALID_LIMIT (ERROR)
//!
//! Parsing and compiling never fail; only the store and the caller's paging
//! arguments can.

use std::fmt;

use crate::observability::Severity;
use crate::store::StoreError;

/// Search error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// The data store failed a read
    UnitsStoreFailed,
    /// Limit of zero
    UnitsInvalidLimit,
}

impl SearchErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SearchErrorCode::UnitsStoreFailed => "UNITS_STORE_FAILED",
            SearchErrorCode::UnitsInvalidLimit => "UNITS_INVALID_LIMIT",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for SearchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Search failure with context
#[derive(Debug)]
pub struct SearchError {
    code: SearchErrorCode,
    message: String,
    source: Option<StoreError>,
}

impl SearchError {
    pub fn store_failed(source: StoreError) -> Self {
        Self {
            code: SearchErrorCode::UnitsStoreFailed,
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn invalid_limit(limit: usize) -> Self {
        Self {
            code: SearchErrorCode::UnitsInvalidLimit,
            message: format!("limit must be at least 1, got {}", limit),
            source: None,
        }
    }

    pub fn code(&self) -> SearchErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if the caller, not the store, is at fault
    pub fn is_client_error(&self) -> bool {
        self.code == SearchErrorCode::UnitsInvalidLimit
    }
}

impl fmt::Display for SearchError {
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

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<StoreError> for SearchError {
    fn from(err: StoreError) -> Self {
        SearchError::store_failed(err)
    }
}

/// Result type for searches
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_format() {
        let err = SearchError::invalid_limit(0);
        assert_eq!(
            err.to_string(),
            "[ERROR] UNITS_INVALID_LIMIT: limit must be at least 1, got 0"
        );
        assert!(err.is_client_error());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_store_error() {
        let err: SearchError = StoreError::Unavailable("down".into()).into();
        assert_eq!(err.code(), SearchErrorCode::UnitsStoreFailed);
        assert!(!err.is_client_error());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("down"));
    }
}
