//! Structural validation of raw JSON payloads.
//!
//! # Design
//! A `Schema` is a const-constructible description of the expected shape, so
//! each resource declares its schema as an associated constant. Checking walks
//! the whole payload and collects every mismatch instead of stopping at the
//! first, then hands the payload to serde for the typed conversion. Unknown
//! fields are ignored.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FieldError, ValidationError};
use crate::types::Resource;

/// Expected shape of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Any,
    /// A whole number that fits `u64`; ids and foreign keys.
    Integer,
    String,
    /// A string with one `@`, a non-empty local part and a dotted domain.
    Email,
    /// A string that parses as an absolute URL.
    Url,
    Boolean,
    Object(&'static [(&'static str, Schema)]),
    Array(&'static Schema),
}

impl Schema {
    pub fn describe(&self) -> &'static str {
        match self {
            Schema::Any => "any value",
            Schema::Integer => "non-negative integer",
            Schema::String => "string",
            Schema::Email => "email address",
            Schema::Url => "URL",
            Schema::Boolean => "boolean",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
        }
    }

    /// Check `value` against this schema, appending mismatches to `errors`.
    pub fn check(&self, value: &Value, path: &str, errors: &mut Vec<FieldError>) {
        let ok = match (self, value) {
            (Schema::Any, _) => true,
            (Schema::Integer, Value::Number(n)) => n.is_u64(),
            (Schema::String, Value::String(_)) => true,
            (Schema::Email, Value::String(s)) => is_email(s),
            (Schema::Url, Value::String(s)) => url::Url::parse(s).is_ok(),
            (Schema::Boolean, Value::Bool(_)) => true,
            (Schema::Object(fields), Value::Object(map)) => {
                for (name, field) in fields.iter() {
                    let child = join(path, name);
                    match map.get(*name) {
                        Some(v) => field.check(v, &child, errors),
                        None => errors.push(FieldError {
                            path: child,
                            expected: field.describe(),
                            actual: "missing".to_string(),
                        }),
                    }
                }
                true
            }
            (Schema::Array(item), Value::Array(values)) => {
                for (i, v) in values.iter().enumerate() {
                    item.check(v, &format!("{path}[{i}]"), errors);
                }
                true
            }
            _ => false,
        };

        if !ok {
            errors.push(FieldError {
                path: path.to_string(),
                expected: self.describe(),
                actual: describe_value(value),
            });
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn is_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// Short human-readable rendering of what was actually received.
fn describe_value(value: &Value) -> String {
    const MAX: usize = 40;
    let kind = match value {
        Value::Null => return "null".to_string(),
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(items) => return format!("array of {} item(s)", items.len()),
        Value::Object(_) => return "object".to_string(),
    };
    let mut rendered = value.to_string();
    if rendered.chars().count() > MAX {
        rendered = rendered.chars().take(MAX).collect::<String>() + "...";
    }
    format!("{kind} ({rendered})")
}

/// Converts a raw payload into `T` or explains why it cannot.
pub trait Validator<T> {
    /// Name used in error messages.
    fn name(&self) -> &'static str;

    fn validate(&self, raw: &Value) -> Result<T, ValidationError>;
}

/// Validates against a `Schema`, then deserializes.
#[derive(Debug)]
pub struct SchemaValidator<T> {
    name: &'static str,
    schema: Schema,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SchemaValidator<T> {
    pub const fn new(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> SchemaValidator<R> {
    pub fn for_resource() -> Self {
        Self::new(R::NAME, R::SCHEMA)
    }
}

impl<T: DeserializeOwned> Validator<T> for SchemaValidator<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn validate(&self, raw: &Value) -> Result<T, ValidationError> {
        let mut errors = Vec::new();
        self.schema.check(raw, "", &mut errors);
        if !errors.is_empty() {
            return Err(ValidationError::new(self.name, errors));
        }
        serde_json::from_value(raw.clone()).map_err(|e| {
            ValidationError::new(
                self.name,
                vec![FieldError {
                    path: String::new(),
                    expected: self.schema.describe(),
                    actual: e.to_string(),
                }],
            )
        })
    }
}

/// Validates a JSON array item by item with an inner validator.
#[derive(Debug, Clone, Copy)]
pub struct ListValidator<V>(pub V);

impl<T, V: Validator<T>> Validator<Vec<T>> for ListValidator<V> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn validate(&self, raw: &Value) -> Result<Vec<T>, ValidationError> {
        let Value::Array(items) = raw else {
            return Err(ValidationError::new(
                self.name(),
                vec![FieldError {
                    path: String::new(),
                    expected: "array",
                    actual: describe_value(raw),
                }],
            ));
        };

        let mut values = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match self.0.validate(item) {
                Ok(value) => values.push(value),
                Err(e) => errors.extend(e.prefixed(&format!("[{i}]")).errors),
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(ValidationError::new(self.name(), errors))
        }
    }
}

/// Accepts any payload unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValidator;

impl Validator<Value> for AnyValidator {
    fn name(&self) -> &'static str {
        "any"
    }

    fn validate(&self, raw: &Value) -> Result<Value, ValidationError> {
        Ok(raw.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Post, User};
    use serde_json::json;

    const GEO: Schema = Schema::Object(&[("lat", Schema::String), ("lng", Schema::String)]);
    const PLACE: Schema = Schema::Object(&[("name", Schema::String), ("geo", GEO)]);

    fn errors_for(schema: Schema, value: Value) -> Vec<FieldError> {
        let mut errors = Vec::new();
        schema.check(&value, "", &mut errors);
        errors
    }

    #[test]
    fn nested_paths_are_dotted() {
        let errors = errors_for(PLACE, json!({"name": "x", "geo": {"lat": 1.5, "lng": "2"}}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "geo.lat");
        assert_eq!(errors[0].expected, "string");
        assert_eq!(errors[0].actual, "number (1.5)");
    }

    #[test]
    fn missing_fields_are_reported() {
        let errors = errors_for(PLACE, json!({"geo": {"lat": "1"}}));
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "geo.lng"]);
        assert!(errors.iter().all(|e| e.actual == "missing"));
    }

    #[test]
    fn every_mismatch_is_collected() {
        let post = json!({"id": 1, "title": "", "body": 123, "userId": "abc"});
        let err = SchemaValidator::<Post>::for_resource()
            .validate(&post)
            .unwrap_err();
        assert_eq!(err.resource, "post");
        assert_eq!(err.paths(), vec!["body", "userId"]);
        assert!(err
            .to_string()
            .contains("userId: expected non-negative integer, got string (\"abc\")"));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let post = json!({"id": 1, "title": "t", "body": "b", "userId": 2, "extra": true});
        let post: Post = SchemaValidator::for_resource().validate(&post).unwrap();
        assert_eq!(post.user_id, 2);
    }

    #[test]
    fn integers_reject_fractions() {
        assert_eq!(errors_for(Schema::Integer, json!(1.5)).len(), 1);
        assert!(errors_for(Schema::Integer, json!(7)).is_empty());
    }

    #[test]
    fn negative_ids_are_reported_on_the_field() {
        let post = json!({"id": -1, "title": "t", "body": "b", "userId": -7});
        let err = SchemaValidator::<Post>::for_resource()
            .validate(&post)
            .unwrap_err();
        assert_eq!(err.paths(), vec!["id", "userId"]);
        assert_eq!(err.errors[0].expected, "non-negative integer");
        assert_eq!(err.errors[0].actual, "number (-1)");
    }

    #[test]
    fn email_shape() {
        assert!(is_email("Sincere@april.biz"));
        assert!(!is_email("no-at-sign.com"));
        assert!(!is_email("two@@example.com"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("user@localhost"));
    }

    #[test]
    fn url_must_be_absolute() {
        let photo_url = json!("https://via.placeholder.com/600/92c952");
        assert!(errors_for(Schema::Url, photo_url).is_empty());
        assert_eq!(errors_for(Schema::Url, json!("not a url")).len(), 1);
    }

    #[test]
    fn long_values_are_truncated() {
        let long = "x".repeat(100);
        let rendered = describe_value(&json!(long));
        assert!(rendered.ends_with("...)"));
        assert!(rendered.len() < 60);
    }

    #[test]
    fn list_validator_prefixes_item_index() {
        let posts = json!([
            {"id": 1, "title": "a", "body": "b", "userId": 1},
            {"id": 2, "title": "a", "body": "b"},
        ]);
        let err = ListValidator(SchemaValidator::<Post>::for_resource())
            .validate(&posts)
            .unwrap_err();
        assert_eq!(err.paths(), vec!["[1].userId"]);
    }

    #[test]
    fn list_validator_rejects_non_arrays() {
        let err = ListValidator(SchemaValidator::<Post>::for_resource())
            .validate(&json!({"id": 1}))
            .unwrap_err();
        assert_eq!(err.errors[0].expected, "array");
        assert_eq!(err.errors[0].actual, "object");
    }

    #[test]
    fn user_schema_checks_nested_company() {
        let user = json!({
            "id": 1, "name": "n", "username": "u", "email": "bad-email",
            "address": {"street": "s", "suite": "s", "city": "c", "zipcode": "z",
                        "geo": {"lat": "1", "lng": "2"}},
            "phone": "p", "website": "w",
            "company": {"name": "c", "catchPhrase": "p"},
        });
        let err = SchemaValidator::<User>::for_resource()
            .validate(&user)
            .unwrap_err();
        assert_eq!(err.paths(), vec!["email", "company.bs"]);
    }

    #[test]
    fn any_validator_passes_through() {
        assert_eq!(AnyValidator.validate(&json!({})).unwrap(), json!({}));
        assert_eq!(AnyValidator.validate(&Value::Null).unwrap(), Value::Null);
    }
}
