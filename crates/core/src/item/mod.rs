//! Record identity and attribute values.

mod attributes;
mod base;
mod value;

pub use attributes::Attributes;
pub use base::{ItemBase, KeyPart};
pub use value::{format_float, ScalarValue, FLOAT_PRECISION};
