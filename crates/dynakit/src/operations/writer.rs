use aws_sdk_dynamodb::operation::delete_item::DeleteItemOutput;
use aws_sdk_dynamodb::operation::put_item::PutItemOutput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemOutput;
use dynakit_core::{ItemBase, Result, StoreError, UpdateBuilder};
use serde_json::Value;

use crate::backend::DynamoBackend;
use crate::item::Item;
use crate::requests;

/// Write-side handle for a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWriterInput {
    pub base: ItemBase,
}

impl ItemWriterInput {
    pub fn new(
        item_type_name: impl Into<String>,
        table_name: impl Into<String>,
        hash_key_name: impl Into<String>,
        hash_key_value: impl Into<Value>,
    ) -> Self {
        Self {
            base: ItemBase::new(item_type_name, table_name, hash_key_name, hash_key_value),
        }
    }

    pub fn with_sort_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base = self.base.with_sort_key(name, value);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.attributes.set(name, value);
        self
    }

    /// Sets every string, number and boolean attribute on the stored record.
    pub async fn update<B>(&self, backend: &B) -> Result<UpdateItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let builder = self
            .base
            .attributes
            .to_update_scalars()
            .into_iter()
            .fold(UpdateBuilder::new(), |builder, (name, value)| {
                builder.with_set(name, value)
            });
        self.update_with_builder(backend, &builder).await
    }

    /// Applies a caller-built update expression to the stored record.
    pub async fn update_with_builder<B>(
        &self,
        backend: &B,
        builder: &UpdateBuilder,
    ) -> Result<UpdateItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::update_item_input(&self.base, builder)?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            key = %self.base.key_display(),
            clauses = builder.len(),
            "UpdateItem"
        );
        backend.update_item(input).await
    }

    /// Writes the record only if no record with the same hash key exists.
    pub async fn create<B>(&self, backend: &B) -> Result<PutItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        self.create_with_item(backend, Item::puttable(&self.base))
            .await
    }

    /// Like [`create`](Self::create) but with a caller-built item; the key is
    /// merged on top.
    pub async fn create_with_item<B>(&self, backend: &B, item: Item) -> Result<PutItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::create_item_input(&self.base, item)?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            key = %self.base.key_display(),
            "PutItem (create)"
        );
        backend.put_item(input).await.map_err(|err| match err {
            StoreError::ConditionFailed(_) => self.base.already_exists(),
            err => err,
        })
    }

    /// Writes the record, replacing any existing one.
    pub async fn upsert<B>(&self, backend: &B) -> Result<PutItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::put_item_input(&self.base, Item::puttable(&self.base))?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            key = %self.base.key_display(),
            "PutItem"
        );
        backend.put_item(input).await
    }

    pub async fn delete<B>(&self, backend: &B) -> Result<DeleteItemOutput>
    where
        B: DynamoBackend + ?Sized,
    {
        let input = requests::delete_item_input(&self.base)?;
        tracing::debug!(
            table = %self.base.table_name,
            item_type = %self.base.item_type_name,
            key = %self.base.key_display(),
            "DeleteItem"
        );
        backend.delete_item(input).await
    }
}

impl From<ItemBase> for ItemWriterInput {
    fn from(base: ItemBase) -> Self {
        Self { base }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::operations::ItemReaderInput;
    use aws_sdk_dynamodb::types::AttributeValue;
    use dynakit_core::{ExpressionError, RecordParamHelper};

    async fn backend() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend.create_table("orders", "customer_id", Some("order_no")).await;
        backend
    }

    fn order() -> ItemWriterInput {
        ItemWriterInput::new("Order", "orders", "customer_id", "c-1")
            .with_sort_key("order_no", 1)
            .with_attribute("status", "open")
            .with_attribute("total", 12.5)
    }

    fn reader() -> ItemReaderInput {
        ItemReaderInput::new("Order", "orders", "customer_id", "c-1").with_sort_key("order_no", 1)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let backend = backend().await;
        order().create(&backend).await.unwrap();

        let output = reader().get(&backend).await.unwrap();
        let item = output.item.unwrap();
        assert_eq!(item["status"], AttributeValue::S("open".to_string()));
        assert_eq!(item["total"], AttributeValue::N("12.5000".to_string()));
    }

    #[tokio::test]
    async fn test_create_twice_reports_already_exists() {
        let backend = backend().await;
        order().create(&backend).await.unwrap();

        let err = order().create(&backend).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::AlreadyExists {
                item_type: "Order".to_string(),
                key: "[c-1:1]".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_create_with_item_merges_key() {
        let backend = backend().await;
        let mut item = Item::new();
        item.insert("note", AttributeValue::S("rush".to_string()));

        order().create_with_item(&backend, item).await.unwrap();

        let stored = reader().get(&backend).await.unwrap().item.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored["customer_id"], AttributeValue::S("c-1".to_string()));
        assert!(!stored.contains_key("status"));
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let backend = backend().await;
        order().upsert(&backend).await.unwrap();

        ItemWriterInput::new("Order", "orders", "customer_id", "c-1")
            .with_sort_key("order_no", 1)
            .with_attribute("status", "void")
            .upsert(&backend)
            .await
            .unwrap();

        let stored = reader().get(&backend).await.unwrap().item.unwrap();
        assert_eq!(stored["status"], AttributeValue::S("void".to_string()));
        assert!(!stored.contains_key("total"));
        assert_eq!(backend.item_count("orders").await, Some(1));
    }

    #[tokio::test]
    async fn test_update_sets_only_given_attributes() {
        let backend = backend().await;
        order().create(&backend).await.unwrap();

        let output = ItemWriterInput::new("Order", "orders", "customer_id", "c-1")
            .with_sort_key("order_no", 1)
            .with_attribute("status", "shipped")
            .with_attribute("gift", true)
            .with_attribute("ignored", serde_json::json!(["not", "scalar"]))
            .update(&backend)
            .await
            .unwrap();

        let attrs = output.attributes.unwrap();
        assert_eq!(attrs["status"], AttributeValue::S("shipped".to_string()));
        assert_eq!(attrs["gift"], AttributeValue::Bool(true));
        assert_eq!(attrs["total"], AttributeValue::N("12.5000".to_string()));
        assert!(!attrs.contains_key("ignored"));
    }

    #[tokio::test]
    async fn test_update_with_only_a_flag() {
        let backend = backend().await;

        let output = ItemWriterInput::new("Order", "orders", "customer_id", "c-1")
            .with_sort_key("order_no", 1)
            .with_attribute("archived", false)
            .update(&backend)
            .await
            .unwrap();

        assert_eq!(
            output.attributes.unwrap()["archived"],
            AttributeValue::Bool(false)
        );
    }

    #[tokio::test]
    async fn test_bound_float_is_stored_unrounded() {
        let backend = backend().await;
        let mut helper = RecordParamHelper::from_query("rate=0.00001");
        let mut rate = 0.0;

        helper.set_float_from_param(&mut rate, "rate");
        let builder = helper.into_builder().unwrap();
        let output = order().update_with_builder(&backend, &builder).await.unwrap();

        assert_eq!(rate, 0.00001);
        assert_eq!(
            output.attributes.unwrap()["rate"],
            AttributeValue::N("0.00001".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_without_attributes_fails() {
        let backend = backend().await;
        let writer = ItemWriterInput::new("Order", "orders", "customer_id", "c-1")
            .with_sort_key("order_no", 1);

        let err = writer.update(&backend).await.unwrap_err();
        assert_eq!(err, StoreError::Expression(ExpressionError::EmptyUpdate));
    }

    #[tokio::test]
    async fn test_update_with_builder() {
        let backend = backend().await;
        order().create(&backend).await.unwrap();

        let builder = UpdateBuilder::new().with_set("priority", true);
        let output = order().update_with_builder(&backend, &builder).await.unwrap();

        assert_eq!(
            output.attributes.unwrap()["priority"],
            AttributeValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let backend = backend().await;
        order().create(&backend).await.unwrap();

        order().delete(&backend).await.unwrap();

        assert!(matches!(
            reader().get(&backend).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_table_passes_through() {
        let backend = InMemoryBackend::new();
        assert!(matches!(
            order().upsert(&backend).await,
            Err(StoreError::TableNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let backend = backend().await;
        let dyn_backend: &dyn DynamoBackend = &backend;

        order().create(dyn_backend).await.unwrap();

        assert_eq!(backend.item_count("orders").await, Some(1));
    }
}
