use std::collections::BTreeMap;

use crate::item::ScalarValue;

use super::ExpressionError;

/// Accumulates `SET` clauses for an UpdateItem request.
///
/// Clauses keep insertion order. Setting a name twice replaces the earlier
/// value in place, since DynamoDB rejects overlapping document paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    clauses: Vec<(String, ScalarValue)>,
}

/// A built update expression with its placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: BTreeMap<String, String>,
    pub values: BTreeMap<String, ScalarValue>,
}

impl UpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.clauses.iter_mut().find(|clause| clause.0 == name) {
            Some(clause) => clause.1 = value,
            None => self.clauses.push((name, value)),
        }
        self
    }

    /// Owned variant of [`UpdateBuilder::set`] for chaining.
    pub fn with_set(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Attribute names in clause order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(|(n, _)| n.as_str())
    }

    pub fn value(&self, name: &str) -> Option<&ScalarValue> {
        self.clauses
            .iter()
            .find(|clause| clause.0 == name)
            .map(|clause| &clause.1)
    }

    /// Renders `SET #n0 = :v0, #n1 = :v1, ...` with placeholder maps.
    ///
    /// Fails on an empty builder, an empty name, or a `NaN`/infinite float.
    pub fn build(&self) -> Result<UpdateExpression, ExpressionError> {
        if self.clauses.is_empty() {
            return Err(ExpressionError::EmptyUpdate);
        }

        let mut names = BTreeMap::new();
        let mut values = BTreeMap::new();
        let mut sets = Vec::with_capacity(self.clauses.len());

        for (idx, (name, value)) in self.clauses.iter().enumerate() {
            if name.is_empty() {
                return Err(ExpressionError::EmptyName);
            }
            if !value.is_finite() {
                return Err(ExpressionError::NonFiniteNumber(name.clone()));
            }
            let name_ph = format!("#n{idx}");
            let value_ph = format!(":v{idx}");
            sets.push(format!("{name_ph} = {value_ph}"));
            names.insert(name_ph, name.clone());
            values.insert(value_ph, value.clone());
        }

        Ok(UpdateExpression {
            expression: format!("SET {}", sets.join(", ")),
            names,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_single_clause() {
        let expr = UpdateBuilder::new().with_set("status", "open").build().unwrap();

        assert_eq!(expr.expression, "SET #n0 = :v0");
        assert_eq!(expr.names["#n0"], "status");
        assert_eq!(expr.values[":v0"], ScalarValue::from("open"));
    }

    #[test]
    fn test_build_multiple_clauses_in_order() {
        let expr = UpdateBuilder::new()
            .with_set("name", "Ada")
            .with_set("age", 36)
            .with_set("score", 9.5)
            .build()
            .unwrap();

        assert_eq!(expr.expression, "SET #n0 = :v0, #n1 = :v1, #n2 = :v2");
        assert_eq!(expr.names["#n1"], "age");
        assert_eq!(expr.values[":v1"], ScalarValue::Int(36));
        assert_eq!(expr.values[":v2"], ScalarValue::Float(9.5));
    }

    #[test]
    fn test_setting_same_name_replaces_value() {
        let mut builder = UpdateBuilder::new();
        builder.set("count", 1).set("other", "x").set("count", 2);

        assert_eq!(builder.len(), 2);
        assert_eq!(builder.names().collect::<Vec<_>>(), vec!["count", "other"]);
        assert_eq!(builder.value("count"), Some(&ScalarValue::Int(2)));
    }

    #[test]
    fn test_empty_builder_fails() {
        assert_eq!(
            UpdateBuilder::new().build(),
            Err(ExpressionError::EmptyUpdate)
        );
    }

    #[test]
    fn test_empty_name_fails() {
        let builder = UpdateBuilder::new().with_set("", 1);
        assert_eq!(builder.build(), Err(ExpressionError::EmptyName));
    }

    #[test]
    fn test_non_finite_float_fails() {
        let builder = UpdateBuilder::new()
            .with_set("status", "open")
            .with_set("rate", f64::NAN);
        assert_eq!(
            builder.build(),
            Err(ExpressionError::NonFiniteNumber("rate".to_string()))
        );

        let builder = UpdateBuilder::new().with_set("rate", f64::INFINITY);
        assert_eq!(
            builder.build(),
            Err(ExpressionError::NonFiniteNumber("rate".to_string()))
        );
    }

    #[test]
    fn test_small_float_is_kept_as_is() {
        let expr = UpdateBuilder::new().with_set("rate", 0.00001).build().unwrap();
        assert_eq!(expr.values[":v0"], ScalarValue::Float(0.00001));
    }
}
