use thiserror::Error;

use crate::expression::ExpressionError;

/// Errors that can occur while reading or writing items.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("{item_type} does not exist: {key}")]
    NotFound { item_type: String, key: String },
    #[error("{item_type} already exists: {key}")]
    AlreadyExists { item_type: String, key: String },
    #[error("Condition check failed: {0}")]
    ConditionFailed(String),
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Throttled: {0}")]
    Throttled(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// Result type for item operations.
pub type Result<T> = std::result::Result<T, StoreError>;
