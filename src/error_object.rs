//! Error normalization.
//!
//! Turns an [`ErrorValue`] into a plain object that any JSON writer can
//! handle. Nested errors (in fields, arrays, objects or the cause) are
//! normalized too; everything else is left for the serializer to visit.

use crate::{ErrorValue, Value};
use indexmap::IndexMap;

/// Plain-object form of `err`.
///
/// Layout, in insertion order: the structural fields, then `name`, `message`,
/// `stack` (when present) and `cause` (when present). The well-known
/// properties overwrite a structural field of the same name.
pub fn serialize_error(err: &ErrorValue) -> Value {
    let mut object: IndexMap<String, Value> =
        err.fields.iter().map(|(k, v)| (k.clone(), normalize_nested(v))).collect();

    object.insert("name".to_string(), Value::String(err.name.clone()));
    object.insert("message".to_string(), Value::String(err.message.clone()));
    if let Some(stack) = &err.stack {
        object.insert("stack".to_string(), Value::String(stack.clone()));
    }
    if let Some(cause) = &err.cause {
        object.insert("cause".to_string(), serialize_error(cause));
    }

    Value::Object(object)
}

fn normalize_nested(value: &Value) -> Value {
    match value {
        Value::Error(err) => serialize_error(err),
        Value::Array(items) => Value::Array(items.iter().map(normalize_nested).collect()),
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), normalize_nested(v))).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
        match value {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    #[test]
    fn exposes_name_and_message() {
        let out = serialize_error(&ErrorValue::new("this is my message"));
        assert_eq!(field(&out, "name"), Some(&Value::from("Error")));
        assert_eq!(field(&out, "message"), Some(&Value::from("this is my message")));
        assert_eq!(field(&out, "stack"), None);
    }

    #[test]
    fn keeps_structural_fields_in_order() {
        let err = ErrorValue::new("boom").with_field("code", "E_BOOM").with_field("status", 500).with_stack("at main");
        let out = serialize_error(&err);
        let Value::Object(map) = &out else { panic!("expected object, got {out:?}") };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["code", "status", "name", "message", "stack"]);
    }

    #[test]
    fn message_wins_over_same_named_field() {
        let err = ErrorValue::new("real").with_field("message", "shadow");
        let out = serialize_error(&err);
        assert_eq!(field(&out, "message"), Some(&Value::from("real")));
    }

    #[test]
    fn nested_errors_are_normalized() {
        let err = ErrorValue::new("outer")
            .with_field("others", Value::Array(vec![ErrorValue::new("inner").into()]))
            .with_cause(ErrorValue::new("root").with_name("TypeError"));
        let out = serialize_error(&err);

        let cause = field(&out, "cause").expect("cause");
        assert_eq!(field(cause, "name"), Some(&Value::from("TypeError")));

        let Some(Value::Array(others)) = field(&out, "others") else { panic!("expected array") };
        assert_eq!(field(&others[0], "message"), Some(&Value::from("inner")));
    }

    #[test]
    fn leaves_other_containers_for_the_serializer() {
        let set = crate::UniqueSet::new().add(1);
        let err = ErrorValue::new("x").with_field("ids", set.clone());
        let out = serialize_error(&err);
        assert_eq!(field(&out, "ids"), Some(&Value::Set(set)));
    }
}
