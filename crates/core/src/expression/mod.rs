//! Update expression building.

mod error;
mod update;

pub use error::ExpressionError;
pub use update::{UpdateBuilder, UpdateExpression};
