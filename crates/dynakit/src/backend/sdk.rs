use async_trait::async_trait;
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::Client;
use dynakit_core::Result;

use super::DynamoBackend;
use crate::client::connect;
use crate::config::ClientConfig;
use crate::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_update_item_error,
};

/// Backend that sends requests to DynamoDB through `aws-sdk-dynamodb`.
#[derive(Debug, Clone)]
pub struct SdkBackend {
    client: Client,
}

impl SdkBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Uses the process-wide client, creating it on first use.
    pub async fn shared(config: &ClientConfig) -> Self {
        Self::new(connect(config).await.clone())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl DynamoBackend for SdkBackend {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput> {
        self.client
            .get_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_consistent_read(input.consistent_read)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .send()
            .await
            .map_err(map_get_item_error)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput> {
        self.client
            .put_item()
            .set_table_name(input.table_name)
            .set_item(input.item)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .send()
            .await
            .map_err(map_put_item_error)
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput> {
        self.client
            .update_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_update_expression(input.update_expression)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .send()
            .await
            .map_err(map_update_item_error)
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput> {
        self.client
            .delete_item()
            .set_table_name(input.table_name)
            .set_key(input.key)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_return_values(input.return_values)
            .send()
            .await
            .map_err(map_delete_item_error)
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput> {
        self.client
            .query()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_key_condition_expression(input.key_condition_expression)
            .set_filter_expression(input.filter_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_limit(input.limit)
            .set_scan_index_forward(input.scan_index_forward)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_consistent_read(input.consistent_read)
            .send()
            .await
            .map_err(map_query_error)
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput> {
        self.client
            .scan()
            .set_table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_filter_expression(input.filter_expression)
            .set_expression_attribute_names(input.expression_attribute_names)
            .set_expression_attribute_values(input.expression_attribute_values)
            .set_limit(input.limit)
            .set_exclusive_start_key(input.exclusive_start_key)
            .set_consistent_read(input.consistent_read)
            .send()
            .await
            .map_err(map_scan_error)
    }
}
