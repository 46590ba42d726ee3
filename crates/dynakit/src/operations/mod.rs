//! Item facades that issue requests against a [`DynamoBackend`](crate::DynamoBackend).

mod reader;
mod writer;

pub use reader::ItemReaderInput;
pub use writer::ItemWriterInput;
