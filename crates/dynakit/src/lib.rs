//! Object-style helpers over Amazon DynamoDB.
//!
//! Describe a record with an [`ItemBase`], wrap it in an
//! [`ItemWriterInput`] or [`ItemReaderInput`], and run the operation
//! against any [`DynamoBackend`]:
//!
//! ```rust,ignore
//! use dynakit::{ClientConfig, ItemReaderInput, SdkBackend};
//!
//! let backend = SdkBackend::shared(&ClientConfig::from_env()).await;
//! let output = ItemReaderInput::new("User", "users", "id", "u-1")
//!     .get(&backend)
//!     .await?;
//! ```
//!
//! The wire conversions and request builders are pure and can be used on
//! their own; [`InMemoryBackend`] stands in for the service in tests.

pub mod backend;
pub mod client;
pub mod config;
pub mod conversions;
pub mod error;
#[cfg(feature = "axum")]
pub mod extract;
pub mod item;
pub mod operations;
pub mod requests;

pub use backend::{DynamoBackend, InMemoryBackend, SdkBackend};
pub use client::{connect, create_client};
pub use config::ClientConfig;
pub use item::Item;
pub use operations::{ItemReaderInput, ItemWriterInput};

pub use dynakit_core::{
    Attributes, ExpressionError, ItemBase, KeyPart, QueryParams, RecordParamHelper, Result,
    ScalarValue, StoreError, UpdateBuilder, UpdateExpression,
};
