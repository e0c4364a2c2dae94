//! Error types for the site kit core

use thiserror::Error;

/// Errors raised by gateways, entities and query libraries
#[derive(Error, Debug)]
pub enum FhskError {
    /// A single-row lookup by id matched nothing
    #[error("Could not find row {0}")]
    RowNotFound(i64),

    #[error("Could not find query {0}")]
    QueryNotFound(String),

    #[error("Invalid row data: {0}")]
    InvalidRow(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FhskError {
    /// True for the lookup failures a caller usually maps to "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RowNotFound(_) | Self::QueryNotFound(_))
    }

    pub fn invalid_row(msg: impl Into<String>) -> Self {
        Self::InvalidRow(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, FhskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_message_names_the_id() {
        let err = FhskError::RowNotFound(420);
        assert_eq!(err.to_string(), "Could not find row 420");
        assert!(err.is_not_found());
    }

    #[test]
    fn storage_errors_are_not_lookup_failures() {
        assert!(!FhskError::storage("disk full").is_not_found());
        assert!(FhskError::QueryNotFound("missing".into()).is_not_found());
    }
}
