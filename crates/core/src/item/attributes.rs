use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ScalarValue;

/// Named, untyped attribute values of a record.
///
/// Values are kept as JSON so callers can stash anything; only strings and
/// numbers survive conversion to the wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Converts every supported value to a scalar, silently dropping the rest.
    pub fn to_scalars(&self) -> BTreeMap<String, ScalarValue> {
        self.0
            .iter()
            .filter_map(|(name, value)| {
                ScalarValue::from_json(value).map(|scalar| (name.clone(), scalar))
            })
            .collect()
    }

    /// Scalars for an update expression: like [`to_scalars`](Self::to_scalars)
    /// but booleans are kept.
    pub fn to_update_scalars(&self) -> BTreeMap<String, ScalarValue> {
        self.0
            .iter()
            .filter_map(|(name, value)| {
                ScalarValue::from_update_json(value).map(|scalar| (name.clone(), scalar))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Value>> for Attributes {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl IntoIterator for Attributes {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut attrs = Attributes::new();
        assert!(attrs.set("name", "Ada").is_none());
        assert_eq!(attrs.set("name", "Grace"), Some(json!("Ada")));
        assert_eq!(attrs.get("name"), Some(&json!("Grace")));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_to_scalars_drops_unsupported_values() {
        let attrs: Attributes = [
            ("name", json!("widget")),
            ("count", json!(3)),
            ("price", json!(9.99)),
            ("active", json!(true)),
            ("tags", json!(["a", "b"])),
            ("nothing", Value::Null),
        ]
        .into_iter()
        .collect();

        let scalars = attrs.to_scalars();

        assert_eq!(scalars.len(), 3);
        assert_eq!(scalars["name"], ScalarValue::from("widget"));
        assert_eq!(scalars["count"], ScalarValue::Int(3));
        assert_eq!(scalars["price"], ScalarValue::Float(9.99));
        assert!(!scalars.contains_key("active"));
    }

    #[test]
    fn test_to_update_scalars_keeps_flags() {
        let attrs: Attributes = [
            ("active", json!(false)),
            ("price", json!(0.00001)),
            ("tags", json!(["a"])),
        ]
        .into_iter()
        .collect();

        let scalars = attrs.to_update_scalars();

        assert_eq!(scalars.len(), 2);
        assert_eq!(scalars["active"], ScalarValue::Bool(false));
        assert_eq!(scalars["price"], ScalarValue::Float(0.00001));
    }

    #[test]
    fn test_empty_attributes() {
        let attrs = Attributes::new();
        assert!(attrs.is_empty());
        assert!(attrs.to_scalars().is_empty());
    }

    #[test]
    fn test_serde_is_transparent() {
        let attrs: Attributes = [("a", json!(1))].into_iter().collect();
        assert_eq!(serde_json::to_value(&attrs).unwrap(), json!({"a": 1}));
    }
}
