//! Pure request builders.
//!
//! Each function turns an [`ItemBase`] into the SDK input for one
//! operation. Nothing here talks to the network, so the exact shape of every
//! request can be asserted in tests.

use std::collections::HashMap;
use std::fmt::Display;

use aws_sdk_dynamodb::operation::delete_item::DeleteItemInput;
use aws_sdk_dynamodb::operation::get_item::GetItemInput;
use aws_sdk_dynamodb::operation::put_item::PutItemInput;
use aws_sdk_dynamodb::operation::query::QueryInput;
use aws_sdk_dynamodb::operation::scan::ScanInput;
use aws_sdk_dynamodb::operation::update_item::UpdateItemInput;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use dynakit_core::{ItemBase, Result, StoreError, UpdateBuilder};

use crate::conversions::{scalar_to_attribute, update_values_to_attributes};
use crate::item::Item;

/// Placeholder used for the hash key in create conditions.
pub const HASH_KEY_PLACEHOLDER: &str = "#pk";

/// Condition that makes a put fail when the item already exists.
pub const CREATE_CONDITION: &str = "attribute_not_exists(#pk)";

fn invalid_request(err: impl Display) -> StoreError {
    StoreError::InvalidRequest(err.to_string())
}

/// Only positive limits are sent; anything else means "no limit".
fn positive_limit(limit: Option<i32>) -> Option<i32> {
    limit.filter(|l| *l > 0)
}

pub fn get_item_input(base: &ItemBase) -> Result<GetItemInput> {
    base.validate()?;
    GetItemInput::builder()
        .table_name(&base.table_name)
        .set_key(Some(Item::key_of(base).into_inner()))
        .build()
        .map_err(invalid_request)
}

/// Unconditional put of `item`.
pub fn put_item_input(base: &ItemBase, item: Item) -> Result<PutItemInput> {
    base.validate()?;
    PutItemInput::builder()
        .table_name(&base.table_name)
        .set_item(Some(item.into_inner()))
        .build()
        .map_err(invalid_request)
}

/// Put that only succeeds when no item with the same hash key exists.
///
/// The key of `base` is merged into `item` before sending.
pub fn create_item_input(base: &ItemBase, mut item: Item) -> Result<PutItemInput> {
    base.validate()?;
    item.merge(Item::key_of(base));
    PutItemInput::builder()
        .table_name(&base.table_name)
        .set_item(Some(item.into_inner()))
        .condition_expression(CREATE_CONDITION)
        .expression_attribute_names(HASH_KEY_PLACEHOLDER, &base.hash_key.name)
        .build()
        .map_err(invalid_request)
}

pub fn update_item_input(base: &ItemBase, builder: &UpdateBuilder) -> Result<UpdateItemInput> {
    base.validate()?;
    let expr = builder.build()?;
    let names: HashMap<String, String> = expr.names.into_iter().collect();

    UpdateItemInput::builder()
        .table_name(&base.table_name)
        .set_key(Some(Item::key_of(base).into_inner()))
        .update_expression(expr.expression)
        .set_expression_attribute_names(Some(names))
        .set_expression_attribute_values(Some(update_values_to_attributes(&expr.values)))
        .return_values(ReturnValue::AllNew)
        .build()
        .map_err(invalid_request)
}

pub fn delete_item_input(base: &ItemBase) -> Result<DeleteItemInput> {
    base.validate()?;
    DeleteItemInput::builder()
        .table_name(&base.table_name)
        .set_key(Some(Item::key_of(base).into_inner()))
        .build()
        .map_err(invalid_request)
}

/// Query with one equality condition per key part of `base`.
pub fn query_input(
    base: &ItemBase,
    index_name: Option<&str>,
    limit: Option<i32>,
    reverse: bool,
) -> Result<QueryInput> {
    base.validate()?;
    let key = base.key_scalars();
    if key.is_empty() {
        return Err(StoreError::InvalidRequest(format!(
            "{} query needs at least one key value",
            base.item_type_name
        )));
    }

    let mut conditions = Vec::with_capacity(key.len());
    let mut names = HashMap::with_capacity(key.len());
    let mut values: HashMap<String, AttributeValue> = HashMap::with_capacity(key.len());
    for (idx, (name, value)) in key.iter().enumerate() {
        conditions.push(format!("#k{idx} = :k{idx}"));
        names.insert(format!("#k{idx}"), name.to_string());
        values.insert(format!(":k{idx}"), scalar_to_attribute(value));
    }

    QueryInput::builder()
        .table_name(&base.table_name)
        .set_index_name(index_name.map(str::to_string))
        .key_condition_expression(conditions.join(" AND "))
        .set_expression_attribute_names(Some(names))
        .set_expression_attribute_values(Some(values))
        .set_limit(positive_limit(limit))
        .scan_index_forward(!reverse)
        .build()
        .map_err(invalid_request)
}

pub fn scan_input(table_name: &str, index_name: Option<&str>, limit: Option<i32>) -> Result<ScanInput> {
    if table_name.is_empty() {
        return Err(StoreError::InvalidRequest(
            "table name must not be empty".to_string(),
        ));
    }
    ScanInput::builder()
        .table_name(table_name)
        .set_index_name(index_name.map(str::to_string))
        .set_limit(positive_limit(limit))
        .build()
        .map_err(invalid_request)
}
