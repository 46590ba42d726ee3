//! Service backends.
//!
//! [`DynamoBackend`] is the seam between the item facades and the service.
//! [`SdkBackend`] forwards to the real AWS client; [`InMemoryBackend`] keeps
//! tables in process memory for tests and local development.

mod memory;
mod sdk;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use dynakit_core::Result;

pub use memory::InMemoryBackend;
pub use sdk::SdkBackend;

/// The six DynamoDB operations the item facades need.
#[async_trait]
pub trait DynamoBackend: Send + Sync {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput>;

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput>;

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput>;

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput>;

    async fn query(&self, input: QueryInput) -> Result<QueryOutput>;

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput>;
}
