use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Attributes, ScalarValue};
use crate::error::{Result, StoreError};

/// One component of a primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPart {
    pub name: String,
    pub value: Value,
}

impl KeyPart {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the value as a scalar, or `None` when it has no wire form.
    pub fn scalar(&self) -> Option<ScalarValue> {
        ScalarValue::from_json(&self.value)
    }
}

/// Logical identity of a stored record plus its attributes.
///
/// The sort key is optional as a whole, so a name without a value (or the
/// reverse) cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBase {
    pub table_name: String,
    pub item_type_name: String,
    pub hash_key: KeyPart,
    pub sort_key: Option<KeyPart>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl ItemBase {
    pub fn new(
        item_type_name: impl Into<String>,
        table_name: impl Into<String>,
        hash_key_name: impl Into<String>,
        hash_key_value: impl Into<Value>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            item_type_name: item_type_name.into(),
            hash_key: KeyPart::new(hash_key_name, hash_key_value),
            sort_key: None,
            attributes: Attributes::new(),
        }
    }

    /// Adds a sort key. An empty name means "no sort key" and is ignored.
    pub fn with_sort_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.sort_key = Some(KeyPart::new(name, value));
        }
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Checks the fields every request needs.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(StoreError::InvalidRequest(
                "table name must not be empty".to_string(),
            ));
        }
        if self.hash_key.name.is_empty() {
            return Err(StoreError::InvalidRequest(format!(
                "{} is missing a hash key name",
                self.item_type_name
            )));
        }
        Ok(())
    }

    /// Key parts whose values have a wire form, hash key first.
    ///
    /// Unsupported key values are skipped rather than reported; the service
    /// rejects the request if a required key part ends up missing.
    pub fn key_scalars(&self) -> Vec<(&str, ScalarValue)> {
        std::iter::once(&self.hash_key)
            .chain(self.sort_key.as_ref())
            .filter_map(|part| part.scalar().map(|v| (part.name.as_str(), v)))
            .collect()
    }

    /// Renders the key as `[hash]` or `[hash:sort]` for messages.
    pub fn key_display(&self) -> String {
        match &self.sort_key {
            Some(sort) => format!(
                "[{}:{}]",
                display_value(&self.hash_key.value),
                display_value(&sort.value)
            ),
            None => format!("[{}]", display_value(&self.hash_key.value)),
        }
    }

    pub fn not_found(&self) -> StoreError {
        StoreError::NotFound {
            item_type: self.item_type_name.clone(),
            key: self.key_display(),
        }
    }

    pub fn already_exists(&self) -> StoreError {
        StoreError::AlreadyExists {
            item_type: self.item_type_name.clone(),
            key: self.key_display(),
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order() -> ItemBase {
        ItemBase::new("Order", "orders", "customer_id", "c-1").with_sort_key("order_no", 42)
    }

    #[test]
    fn test_key_scalars_with_sort_key() {
        let base = order();
        assert_eq!(
            base.key_scalars(),
            vec![
                ("customer_id", ScalarValue::from("c-1")),
                ("order_no", ScalarValue::Int(42)),
            ]
        );
    }

    #[test]
    fn test_empty_sort_key_name_is_ignored() {
        let base = ItemBase::new("Order", "orders", "customer_id", "c-1").with_sort_key("", 1);
        assert!(base.sort_key.is_none());
        assert_eq!(base.key_scalars().len(), 1);
    }

    #[test]
    fn test_unsupported_key_value_is_skipped() {
        let base = ItemBase::new("Order", "orders", "customer_id", json!({"nested": true}))
            .with_sort_key("order_no", 7);
        assert_eq!(base.key_scalars(), vec![("order_no", ScalarValue::Int(7))]);
    }

    #[test]
    fn test_validate() {
        assert!(order().validate().is_ok());

        let no_table = ItemBase::new("Order", "", "customer_id", "c-1");
        assert!(matches!(
            no_table.validate(),
            Err(StoreError::InvalidRequest(_))
        ));

        let no_hash = ItemBase::new("Order", "orders", "", "c-1");
        assert!(matches!(no_hash.validate(), Err(StoreError::InvalidRequest(_))));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(order().key_display(), "[c-1:42]");
        assert_eq!(
            ItemBase::new("User", "users", "id", "u-9").key_display(),
            "[u-9]"
        );
    }

    #[test]
    fn test_not_found_error() {
        assert_eq!(order().not_found().to_string(), "Order does not exist: [c-1:42]");
    }

    #[test]
    fn test_with_attribute() {
        let base = order().with_attribute("status", "open");
        assert_eq!(base.attributes.get("status"), Some(&json!("open")));
    }
}
