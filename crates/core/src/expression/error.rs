use thiserror::Error;

/// Errors raised while building an expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("Update expression has no clauses")]
    EmptyUpdate,
    #[error("Attribute name in expression must not be empty")]
    EmptyName,
    #[error("Value for {0} is not a finite number")]
    NonFiniteNumber(String),
}
