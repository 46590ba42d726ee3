use crate::expression::UpdateBuilder;
use crate::item::ScalarValue;

use super::parse::{parse_bool, parse_float, parse_int32, parse_int64};
use super::QueryParams;

/// Binds a request's parameters to local fields and an update expression.
///
/// Each `set_*_from_param` call looks up one key. When the key is present
/// and its first value parses, the value is written to `loc`, a `SET`
/// clause is recorded and [`changed`](Self::changed) becomes true. Values
/// that fail to parse are skipped without an error.
#[derive(Debug, Clone, Default)]
pub struct RecordParamHelper {
    params: QueryParams,
    builder: Option<UpdateBuilder>,
    changed: bool,
}

impl RecordParamHelper {
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            builder: None,
            changed: false,
        }
    }

    pub fn from_query(query: &str) -> Self {
        Self::new(QueryParams::parse(query))
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// True once at least one clause has been recorded.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn builder(&self) -> Option<&UpdateBuilder> {
        self.builder.as_ref()
    }

    pub fn into_builder(self) -> Option<UpdateBuilder> {
        self.builder
    }

    /// Records a `SET key = value` clause unconditionally.
    pub fn add_to_builder(&mut self, key: &str, value: impl Into<ScalarValue>) {
        self.builder
            .get_or_insert_with(UpdateBuilder::new)
            .set(key, value);
        self.changed = true;
    }

    pub fn set_string_from_param(&mut self, loc: &mut String, key: &str) {
        let Some(raw) = self.lookup(key) else {
            return;
        };
        *loc = raw.clone();
        self.add_to_builder(key, raw);
    }

    pub fn set_float_from_param(&mut self, loc: &mut f64, key: &str) {
        self.bind(loc, key, parse_float);
    }

    /// Binds a 32-bit integer.
    ///
    /// An empty value clears the stored attribute to `""` and leaves `loc`
    /// untouched.
    pub fn set_int_from_param(&mut self, loc: &mut i32, key: &str) {
        let Some(raw) = self.lookup(key) else {
            return;
        };
        if raw.is_empty() {
            self.add_to_builder(key, raw);
            return;
        }
        if let Some(value) = parse_int32(&raw) {
            *loc = value;
            self.add_to_builder(key, value);
        }
    }

    pub fn set_int64_from_param(&mut self, loc: &mut i64, key: &str) {
        self.bind(loc, key, parse_int64);
    }

    pub fn set_bool_from_param(&mut self, loc: &mut bool, key: &str) {
        self.bind(loc, key, parse_bool);
    }

    fn bind<T>(&mut self, loc: &mut T, key: &str, parse: fn(&str) -> Option<T>)
    where
        T: Copy + Into<ScalarValue>,
    {
        let Some(raw) = self.lookup(key) else {
            return;
        };
        if let Some(value) = parse(&raw) {
            *loc = value;
            self.add_to_builder(key, value);
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        self.params.get(key).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Profile {
        name: String,
        rating: f64,
        age: i32,
        visits: i64,
        active: bool,
    }

    fn bind_all(helper: &mut RecordParamHelper, profile: &mut Profile) {
        helper.set_string_from_param(&mut profile.name, "name");
        helper.set_float_from_param(&mut profile.rating, "rating");
        helper.set_int_from_param(&mut profile.age, "age");
        helper.set_int64_from_param(&mut profile.visits, "visits");
        helper.set_bool_from_param(&mut profile.active, "active");
    }

    #[test]
    fn test_binds_every_recognized_param() {
        let mut helper = RecordParamHelper::from_query(
            "name=Ada&rating=4.5&age=36&visits=9000000000&active=true",
        );
        let mut profile = Profile::default();

        bind_all(&mut helper, &mut profile);

        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.rating, 4.5);
        assert_eq!(profile.age, 36);
        assert_eq!(profile.visits, 9_000_000_000);
        assert!(profile.active);
        assert!(helper.changed());

        let builder = helper.builder().unwrap();
        assert_eq!(
            builder.names().collect::<Vec<_>>(),
            vec!["name", "rating", "age", "visits", "active"]
        );
        assert_eq!(builder.value("age"), Some(&ScalarValue::Int(36)));
        assert_eq!(builder.value("active"), Some(&ScalarValue::Bool(true)));
        assert_eq!(builder.value("rating"), Some(&ScalarValue::Float(4.5)));
    }

    #[test]
    fn test_absent_params_leave_helper_unchanged() {
        let mut helper = RecordParamHelper::from_query("unrelated=1");
        let mut profile = Profile::default();

        bind_all(&mut helper, &mut profile);

        assert!(!helper.changed());
        assert!(helper.builder().is_none());
        assert_eq!(profile.age, 0);
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let mut helper = RecordParamHelper::from_query("rating=high&visits=lots&active=maybe&name=Bo");
        let mut profile = Profile {
            rating: 1.0,
            visits: 5,
            ..Profile::default()
        };

        bind_all(&mut helper, &mut profile);

        assert_eq!(profile.rating, 1.0);
        assert_eq!(profile.visits, 5);
        assert!(!profile.active);
        assert_eq!(helper.builder().unwrap().names().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_int_out_of_32_bit_range_is_ignored() {
        let mut helper = RecordParamHelper::from_query("age=3000000000");
        let mut age = 7;

        helper.set_int_from_param(&mut age, "age");

        assert_eq!(age, 7);
        assert!(!helper.changed());
    }

    #[test]
    fn test_empty_int_sets_empty_string_clause() {
        let mut helper = RecordParamHelper::from_query("age=");
        let mut age = 7;

        helper.set_int_from_param(&mut age, "age");

        assert_eq!(age, 7);
        assert!(helper.changed());
        assert_eq!(
            helper.builder().unwrap().value("age"),
            Some(&ScalarValue::String(String::new()))
        );
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut helper = RecordParamHelper::from_query("=value");
        let mut name = String::from("keep");

        helper.set_string_from_param(&mut name, "");

        assert_eq!(name, "keep");
        assert!(!helper.changed());
    }

    #[test]
    fn test_add_to_builder_marks_changed() {
        let mut helper = RecordParamHelper::default();
        helper.add_to_builder("updated_by", "api");

        assert!(helper.changed());
        let expr = helper.into_builder().unwrap().build().unwrap();
        assert_eq!(expr.expression, "SET #n0 = :v0");
        assert_eq!(expr.names["#n0"], "updated_by");
    }
}
