//! In-memory backend for testing.
//!
//! Stores tables as vectors of raw items behind `Arc<RwLock<_>>`. It
//! understands the subset of DynamoDB that dynakit emits: equality key
//! conditions, `SET` update expressions, and `attribute_exists` /
//! `attribute_not_exists` conditions.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemInput, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemInput, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemInput, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryInput, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanInput, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemInput, UpdateItemOutput};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use dynakit_core::{Result, StoreError};
use tokio::sync::RwLock;

use super::DynamoBackend;

type RawItem = HashMap<String, AttributeValue>;
type Names = HashMap<String, String>;
type Values = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
struct KeySchema {
    hash_key: String,
    sort_key: Option<String>,
}

impl KeySchema {
    fn new(hash_key: &str, sort_key: Option<&str>) -> Self {
        Self {
            hash_key: hash_key.to_string(),
            sort_key: sort_key.map(str::to_string),
        }
    }

    /// Extracts the key attributes from `item`, failing if any is missing.
    fn key_of(&self, item: &RawItem) -> Result<RawItem> {
        let mut key = RawItem::new();
        for name in std::iter::once(&self.hash_key).chain(self.sort_key.as_ref()) {
            let value = item.get(name).ok_or_else(|| {
                StoreError::InvalidRequest(format!(
                    "The provided key element does not match the schema: missing {name}"
                ))
            })?;
            key.insert(name.clone(), value.clone());
        }
        Ok(key)
    }

    /// Validates a request key: exactly the schema's key attributes.
    fn exact_key(&self, key: &RawItem) -> Result<RawItem> {
        if let Some(extra) = key.keys().find(|name| !self.is_key_attribute(name)) {
            return Err(StoreError::InvalidRequest(format!(
                "The provided key element does not match the schema: unexpected {extra}"
            )));
        }
        self.key_of(key)
    }

    fn is_key_attribute(&self, name: &str) -> bool {
        self.hash_key == name || self.sort_key.as_deref() == Some(name)
    }

    fn matches(&self, item: &RawItem, key: &RawItem) -> bool {
        key.iter().all(|(name, value)| item.get(name) == Some(value))
    }
}

#[derive(Debug, Clone)]
struct Table {
    schema: KeySchema,
    indexes: HashMap<String, KeySchema>,
    items: Vec<RawItem>,
}

impl Table {
    fn position(&self, key: &RawItem) -> Option<usize> {
        self.items.iter().position(|item| self.schema.matches(item, key))
    }

    fn schema_for(&self, index_name: Option<&str>) -> Result<&KeySchema> {
        match index_name {
            None => Ok(&self.schema),
            Some(name) => self.indexes.get(name).ok_or_else(|| {
                StoreError::InvalidRequest(format!("The table does not have the specified index: {name}"))
            }),
        }
    }
}

/// In-memory stand-in for DynamoDB.
///
/// Tables must be declared with [`create_table`](Self::create_table) before
/// use; requests against unknown tables fail with `TableNotFound`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryBackend {
    /// Creates a new backend with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table with the given key schema. Existing data is dropped.
    pub async fn create_table(&self, name: &str, hash_key: &str, sort_key: Option<&str>) {
        let mut tables = self.tables.write().await;
        tables.insert(
            name.to_string(),
            Table {
                schema: KeySchema::new(hash_key, sort_key),
                indexes: HashMap::new(),
                items: Vec::new(),
            },
        );
    }

    /// Declares a secondary index on an existing table.
    pub async fn create_index(
        &self,
        table: &str,
        index: &str,
        hash_key: &str,
        sort_key: Option<&str>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        table
            .indexes
            .insert(index.to_string(), KeySchema::new(hash_key, sort_key));
        Ok(())
    }

    /// Number of items stored in `table`, or `None` if it does not exist.
    pub async fn item_count(&self, table: &str) -> Option<usize> {
        self.tables.read().await.get(table).map(|t| t.items.len())
    }
}

fn require_table<'a>(
    tables: &'a HashMap<String, Table>,
    name: Option<&str>,
) -> Result<&'a Table> {
    let name = name.unwrap_or_default();
    tables
        .get(name)
        .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
}

fn require_table_mut<'a>(
    tables: &'a mut HashMap<String, Table>,
    name: Option<&str>,
) -> Result<&'a mut Table> {
    let name = name.unwrap_or_default();
    tables
        .get_mut(name)
        .ok_or_else(|| StoreError::TableNotFound(name.to_string()))
}

fn resolve_name(token: &str, names: Option<&Names>) -> Result<String> {
    if !token.starts_with('#') {
        return Ok(token.to_string());
    }
    names
        .and_then(|n| n.get(token))
        .cloned()
        .ok_or_else(|| StoreError::InvalidRequest(format!("unbound name placeholder {token}")))
}

fn resolve_value(token: &str, values: Option<&Values>) -> Result<AttributeValue> {
    values
        .and_then(|v| v.get(token))
        .cloned()
        .ok_or_else(|| StoreError::InvalidRequest(format!("unbound value placeholder {token}")))
}

/// Evaluates `attribute_exists(x)` / `attribute_not_exists(x)` against the
/// current item, if any.
fn check_condition(
    condition: Option<&str>,
    names: Option<&Names>,
    current: Option<&RawItem>,
) -> Result<()> {
    let Some(condition) = condition.map(str::trim) else {
        return Ok(());
    };

    let (must_exist, inner) = if let Some(rest) = condition.strip_prefix("attribute_not_exists(") {
        (false, rest)
    } else if let Some(rest) = condition.strip_prefix("attribute_exists(") {
        (true, rest)
    } else {
        return Err(StoreError::InvalidRequest(format!(
            "unsupported condition expression: {condition}"
        )));
    };

    let token = inner.strip_suffix(')').map(str::trim).ok_or_else(|| {
        StoreError::InvalidRequest(format!("malformed condition expression: {condition}"))
    })?;
    let attribute = resolve_name(token, names)?;
    let exists = current.is_some_and(|item| item.contains_key(&attribute));

    if exists == must_exist {
        Ok(())
    } else {
        Err(StoreError::ConditionFailed(
            "The conditional request failed".to_string(),
        ))
    }
}

/// Splits `a = b AND c = d` (or `a = b, c = d`) into resolved pairs.
fn parse_assignments<'a>(clauses: impl Iterator<Item = &'a str>) -> Result<Vec<(&'a str, &'a str)>> {
    clauses
        .map(|clause| {
            clause
                .split_once('=')
                .map(|(lhs, rhs)| (lhs.trim(), rhs.trim()))
                .ok_or_else(|| StoreError::InvalidRequest(format!("malformed clause: {clause}")))
        })
        .collect()
}

fn apply_update(
    item: &mut RawItem,
    expression: &str,
    names: Option<&Names>,
    values: Option<&Values>,
) -> Result<()> {
    let body = expression
        .trim()
        .strip_prefix("SET ")
        .ok_or_else(|| StoreError::InvalidRequest(format!("unsupported update expression: {expression}")))?;

    for (lhs, rhs) in parse_assignments(body.split(','))? {
        let name = resolve_name(lhs, names)?;
        let value = resolve_value(rhs, values)?;
        item.insert(name, value);
    }
    Ok(())
}

fn compare_attributes(a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> Ordering {
    match (a, b) {
        (Some(AttributeValue::N(x)), Some(AttributeValue::N(y))) => {
            let x = x.parse::<f64>().unwrap_or(f64::NAN);
            let y = y.parse::<f64>().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(AttributeValue::S(x)), Some(AttributeValue::S(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn positive_limit(limit: Option<i32>) -> Option<usize> {
    limit.and_then(|l| usize::try_from(l).ok()).filter(|l| *l > 0)
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[async_trait]
impl DynamoBackend for InMemoryBackend {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput> {
        let tables = self.tables.read().await;
        let table = require_table(&tables, input.table_name.as_deref())?;
        let key = table.schema.exact_key(&input.key.unwrap_or_default())?;

        let item = table.position(&key).map(|idx| table.items[idx].clone());
        Ok(GetItemOutput::builder().set_item(item).build())
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput> {
        let mut tables = self.tables.write().await;
        let table = require_table_mut(&mut tables, input.table_name.as_deref())?;
        let item = input.item.unwrap_or_default();
        let key = table.schema.key_of(&item)?;
        let position = table.position(&key);

        check_condition(
            input.condition_expression.as_deref(),
            input.expression_attribute_names.as_ref(),
            position.map(|idx| &table.items[idx]),
        )?;

        let old = match position {
            Some(idx) => Some(std::mem::replace(&mut table.items[idx], item)),
            None => {
                table.items.push(item);
                None
            }
        };

        let attributes = old.filter(|_| input.return_values == Some(ReturnValue::AllOld));
        Ok(PutItemOutput::builder().set_attributes(attributes).build())
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput> {
        let mut tables = self.tables.write().await;
        let table = require_table_mut(&mut tables, input.table_name.as_deref())?;
        let key = table.schema.exact_key(&input.key.unwrap_or_default())?;
        let position = table.position(&key);
        let names = input.expression_attribute_names.as_ref();

        check_condition(
            input.condition_expression.as_deref(),
            names,
            position.map(|idx| &table.items[idx]),
        )?;

        let mut item = match position {
            Some(idx) => table.items[idx].clone(),
            None => key.clone(),
        };
        if let Some(expression) = input.update_expression.as_deref() {
            apply_update(
                &mut item,
                expression,
                names,
                input.expression_attribute_values.as_ref(),
            )?;
        }

        match position {
            Some(idx) => table.items[idx] = item.clone(),
            None => table.items.push(item.clone()),
        }

        let attributes = (input.return_values == Some(ReturnValue::AllNew)).then_some(item);
        Ok(UpdateItemOutput::builder().set_attributes(attributes).build())
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<DeleteItemOutput> {
        let mut tables = self.tables.write().await;
        let table = require_table_mut(&mut tables, input.table_name.as_deref())?;
        let key = table.schema.exact_key(&input.key.unwrap_or_default())?;
        let position = table.position(&key);

        check_condition(
            input.condition_expression.as_deref(),
            input.expression_attribute_names.as_ref(),
            position.map(|idx| &table.items[idx]),
        )?;

        let old = position.map(|idx| table.items.remove(idx));
        let attributes = old.filter(|_| input.return_values == Some(ReturnValue::AllOld));
        Ok(DeleteItemOutput::builder().set_attributes(attributes).build())
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput> {
        let tables = self.tables.read().await;
        let table = require_table(&tables, input.table_name.as_deref())?;
        let schema = table.schema_for(input.index_name.as_deref())?;

        let expression = input.key_condition_expression.as_deref().ok_or_else(|| {
            StoreError::InvalidRequest("query requires a key condition expression".to_string())
        })?;
        let mut conditions = RawItem::new();
        for (lhs, rhs) in parse_assignments(expression.split(" AND "))? {
            let name = resolve_name(lhs, input.expression_attribute_names.as_ref())?;
            let value = resolve_value(rhs, input.expression_attribute_values.as_ref())?;
            if !schema.is_key_attribute(&name) {
                return Err(StoreError::InvalidRequest(format!(
                    "Query key condition not supported on non-key attribute: {name}"
                )));
            }
            conditions.insert(name, value);
        }
        if !conditions.contains_key(&schema.hash_key) {
            return Err(StoreError::InvalidRequest(format!(
                "Query condition missed key schema element: {}",
                schema.hash_key
            )));
        }

        let mut matched: Vec<RawItem> = table
            .items
            .iter()
            .filter(|item| schema.matches(item, &conditions))
            .cloned()
            .collect();
        let scanned = matched.len();

        if let Some(sort_key) = &schema.sort_key {
            matched.sort_by(|a, b| compare_attributes(a.get(sort_key), b.get(sort_key)));
        }
        if input.scan_index_forward == Some(false) {
            matched.reverse();
        }
        if let Some(limit) = positive_limit(input.limit) {
            matched.truncate(limit);
        }

        Ok(QueryOutput::builder()
            .count(count(matched.len()))
            .scanned_count(count(scanned))
            .set_items(Some(matched))
            .build())
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput> {
        let tables = self.tables.read().await;
        let table = require_table(&tables, input.table_name.as_deref())?;
        let schema = table.schema_for(input.index_name.as_deref())?;

        // Secondary indexes are sparse: only items carrying the index key appear.
        let mut items: Vec<RawItem> = table
            .items
            .iter()
            .filter(|item| item.contains_key(&schema.hash_key))
            .cloned()
            .collect();
        if let Some(limit) = positive_limit(input.limit) {
            items.truncate(limit);
        }

        Ok(ScanOutput::builder()
            .count(count(items.len()))
            .scanned_count(count(items.len()))
            .set_items(Some(items))
            .build())
    }
}
