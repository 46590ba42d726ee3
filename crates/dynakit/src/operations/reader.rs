use aws_sdk_dynamodb::operation::get_item::GetItemOutput;
use aws_sdk_dynamodb::operation::query::QueryOutput;
use aws_sdk_dynamodb::operation::scan::ScanOutput;
use dynakit_core::{ItemBase, Result};
use serde_json::Value;

use crate::backend::DynamoBackend;
use crate::requests;

/// Read-side handle for a record, or for the partition it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReaderInput {
    pub base: ItemBase,
    /// Secondary index to query or scan instead of the base table.
    pub index_name: Option<String>,
}

impl ItemReaderInput {
    pub fn new(
        item_type_name: impl Into<String>,
        table_name: impl Into<String>,
        hash_key_name: impl Into<String>,
        hash_key_value: impl Into<Value>,
    ) -> Self {
        Self {
            base: ItemBase::new(item_type_name, table_name, hash_key_name, hash_key_value),
            index_name: None,
        }
    }

    pub fn with_sort_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base = self.base.with_sort_key(name, value);
        self
    }

    /// Targets a secondary index. An empty name keeps the base table.
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        let index_name = index_name.into();
        self.index_name = (!index_name.is_empty()).then_some(index_name);
        self
    }

    /// Fetches the record, failing with `NotFound` when it does not exist.
    pub async fn get<B>(&self, backend: &B) -> Result<GetItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::get_item_input(&self.base)?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            key = %self.base.key_display(),
            "GetItem"
        );
        let output = backend.get_item(input).await?;
        if output.item.is_none() {
            return Err(self.base.not_found());
        }
        Ok(output)
    }

    /// Queries records whose key attributes equal this record's key.
    ///
    /// `limit` values of zero or less mean "no limit". With `reverse` the
    /// results come back in descending sort key order.
    pub async fn list<B>(&self, backend: &B, limit: Option<i32>, reverse: bool) -> Result<QueryOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::query_input(&self.base, self.index_name.as_deref(), limit, reverse)?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            index = ?self.index_name,
            ?limit,
            reverse,
            "Query"
        );
        backend.query(input).await
    }

    /// Scans the table (or index) without any key condition.
    pub async fn scan<B>(&self, backend: &B, limit: Option<i32>) -> Result<ScanOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::scan_input(&self.base.table_name, self.index_name.as_deref(), limit)?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            index = ?self.index_name,
            ?limit,
            "Scan"
        );
        backend.scan(input).await
    }
}

impl From<ItemBase> for ItemReaderInput {
    fn from(base: ItemBase) -> Self {
        Self {
            base,
            index_name: None,
        }
    }
}
