//! Wire-level record representation.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use dynakit_core::{Attributes, ItemBase};

use crate::conversions::{attribute_to_json, json_to_attribute, scalar_to_attribute};

/// A record as DynamoDB sees it: attribute name to tagged value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item(HashMap<String, AttributeValue>);

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an item from untyped attributes, skipping unsupported values.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        attributes
            .iter()
            .filter_map(|(name, value)| json_to_attribute(value).map(|av| (name.clone(), av)))
            .collect()
    }

    /// Builds the primary key of `base`.
    pub fn key_of(base: &ItemBase) -> Self {
        base.key_scalars()
            .into_iter()
            .map(|(name, value)| (name.to_string(), scalar_to_attribute(&value)))
            .collect()
    }

    /// Attributes of `base` with its key merged on top.
    pub fn puttable(base: &ItemBase) -> Self {
        let mut item = Self::from_attributes(&base.attributes);
        item.merge(Self::key_of(base));
        item
    }

    /// Copies every entry of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: Item) {
        self.0.extend(other.0);
    }

    /// Converts back to untyped attributes, dropping values with no JSON form.
    pub fn to_attributes(&self) -> Attributes {
        self.0
            .iter()
            .filter_map(|(name, av)| attribute_to_json(av).map(|v| (name.clone(), v)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) -> Option<AttributeValue> {
        self.0.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> HashMap<String, AttributeValue> {
        self.0
    }
}

impl From<HashMap<String, AttributeValue>> for Item {
    fn from(map: HashMap<String, AttributeValue>) -> Self {
        Self(map)
    }
}

impl From<Item> for HashMap<String, AttributeValue> {
    fn from(item: Item) -> Self {
        item.0
    }
}

impl FromIterator<(String, AttributeValue)> for Item {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
