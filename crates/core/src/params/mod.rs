//! URL parameter binding for partial updates.
//!
//! A [`RecordParamHelper`] reads recognized keys out of a query string,
//! writes the parsed values into caller-owned fields, and records one `SET`
//! clause per value so the same request can be forwarded as an UpdateItem.

mod binder;
mod parse;
mod values;

pub use binder::RecordParamHelper;
pub use parse::{parse_bool, parse_float, parse_int32, parse_int64};
pub use values::QueryParams;
