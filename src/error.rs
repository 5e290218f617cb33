//! Error types for member search.
//!
//! Validation problems are reported before any I/O happens. Storage failures are
//! wrapped with the operation name and the sub-query that failed, so a caller can
//! tell a content-fetch failure from a count-fetch failure. An empty result set is
//! never an error.

use std::fmt;
use thiserror::Error;

/// Identifies which query of an operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Projected content rows
    Content,
    /// Standalone total count
    Count,
    /// Content and total fetched in one round-trip
    ContentWithCount,
    /// Existence probe
    Existence,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Content => write!(f, "content"),
            QueryKind::Count => write!(f, "count"),
            QueryKind::ContentWithCount => write!(f, "content+count"),
            QueryKind::Existence => write!(f, "existence"),
        }
    }
}

/// Failure reported by a storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Storage error in {operation} ({query} query): {source}")]
    StorageError {
        operation: &'static str,
        query: QueryKind,
        #[source]
        source: StoreError,
    },
    #[error("Timeout error: {operation} exceeded {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl SearchError {
    /// Wrap a store failure with the operation and sub-query it came from
    pub fn storage(operation: &'static str, query: QueryKind, source: StoreError) -> Self {
        SearchError::StorageError {
            operation,
            query,
            source,
        }
    }

    /// Which sub-query failed, if this is a storage error
    pub fn failed_query(&self) -> Option<QueryKind> {
        match self {
            SearchError::StorageError { query, .. } => Some(*query),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::ValidationError(_))
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        SearchError::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
