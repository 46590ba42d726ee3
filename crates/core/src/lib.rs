//! Functional core for dynakit.
//!
//! Pure data types and functions for describing DynamoDB records, building
//! update expressions, and binding URL parameters to updates. Nothing in
//! this crate performs I/O; the `dynakit` crate turns these values into
//! service requests.

pub mod error;
pub mod expression;
pub mod http_mapping;
pub mod item;
pub mod params;

pub use error::{Result, StoreError};
pub use expression::{ExpressionError, UpdateBuilder, UpdateExpression};
pub use http_mapping::store_error_to_status_code;
pub use item::{Attributes, ItemBase, KeyPart, ScalarValue};
pub use params::{QueryParams, RecordParamHelper};
