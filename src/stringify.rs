//! JSON text serializer with a per-node replacer callback.
//!
//! Traversal follows the usual stringify order:
//!
//! ```text
//! callback("", root)
//!   └─ result is an array  -> callback("0", item0), callback("1", item1), ...
//!   └─ result is an object -> callback(name, member) for each member, in order
//!   └─ anything else       -> written in its native form
//! ```
//!
//! Native forms for values no callback transformed: maps and sets have no
//! enumerable members and print as `{}`, instants print as ISO-8601 strings,
//! errors print only their structural fields, non-finite numbers print as
//! `null`. Finite numbers print the way JavaScript's `Number#toString` does:
//! plain digits up to 21 integer places, exponent form beyond that or below
//! one millionth.

use crate::engine::{TemporalHandler, installed};
use crate::{HandlerError, StringifyError, Value};
use serde::Serialize;
use serde_json::Value as Json;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io;

/// Per-node callback signature, as produced by [`crate::Replacer`].
pub type ReplacerFn<'a> = dyn Fn(&str, Value) -> Result<Value, HandlerError> + 'a;

const MAX_INDENT: usize = 10;

/// Indentation for pretty output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Space {
    /// That many spaces per level, at most 10.
    Indent(usize),
    /// This string per level, truncated to 10 characters.
    Text(String),
}

impl Space {
    fn unit(&self) -> String {
        match self {
            Space::Indent(n) => " ".repeat((*n).min(MAX_INDENT)),
            Space::Text(s) => s.chars().take(MAX_INDENT).collect(),
        }
    }
}

impl From<usize> for Space {
    fn from(n: usize) -> Self {
        Space::Indent(n)
    }
}

impl From<&str> for Space {
    fn from(s: &str) -> Self {
        Space::Text(s.to_string())
    }
}

/// Serialize `value` to JSON text.
///
/// `replacer` is called once per node, starting with key `""` for the root.
/// When it is `None`, the globally installed replacer is used if there is one
/// (see [`crate::Options::intercept_global_serializer`]); otherwise every
/// value is written in its native form.
///
/// A callback error stops serialization and is returned as
/// [`StringifyError::Handler`], unchanged.
pub fn stringify(value: Value, replacer: Option<&ReplacerFn<'_>>, space: Option<Space>) -> Result<String, StringifyError> {
    let global = if replacer.is_none() { installed() } else { None };
    let global_fn = global.as_ref().map(|r| move |key: &str, value: Value| r.resolve(key, value));

    let callback: Option<&ReplacerFn<'_>> = match (replacer, &global_fn) {
        (Some(r), _) => Some(r),
        (None, Some(f)) => Some(f as &ReplacerFn<'_>),
        (None, None) => None,
    };

    let json = serialize_property("", value, callback)?;
    write(&json, space)
}

fn serialize_property(key: &str, value: Value, callback: Option<&ReplacerFn<'_>>) -> Result<Json, StringifyError> {
    let value = match callback {
        Some(cb) => cb(key, value)?,
        None => value,
    };

    let json = match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(b),
        Value::Number(n) => number(n),
        Value::String(s) => Json::String(s),
        Value::Array(items) => Json::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| serialize_property(&idx.to_string(), item, callback))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(members) => serialize_members(members, callback)?,
        Value::Map(_) | Value::Set(_) => Json::Object(serde_json::Map::new()),
        Value::Date(instant) => Json::String(TemporalHandler::canonical(&instant)),
        Value::Error(err) => serialize_members(err.fields, callback)?,
    };

    Ok(json)
}

fn serialize_members(
    members: impl IntoIterator<Item = (String, Value)>,
    callback: Option<&ReplacerFn<'_>>,
) -> Result<Json, StringifyError> {
    let mut object = serde_json::Map::new();
    for (name, member) in members {
        let json = serialize_property(&name, member, callback)?;
        object.insert(name, json);
    }
    Ok(Json::Object(object))
}

fn number(n: f64) -> Json {
    serde_json::Number::from_f64(n).map_or(Json::Null, Json::Number)
}

fn write(json: &Json, space: Option<Space>) -> Result<String, StringifyError> {
    let unit = space.map(|s| s.unit()).unwrap_or_default();
    if unit.is_empty() {
        render(json, CompactFormatter)
    } else {
        render(json, PrettyFormatter::with_indent(unit.as_bytes()))
    }
}

fn render<F: Formatter>(json: &Json, formatter: F) -> Result<String, StringifyError> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, JsNumbers(formatter));
    json.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|err| StringifyError::Json(serde::ser::Error::custom(err)))
}

/// Wraps a layout formatter and prints floats in JavaScript notation.
struct JsNumbers<F>(F);

impl<F: Formatter> Formatter for JsNumbers<F> {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(js_number(value).as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

// Shortest round-trip digits laid out per Number#toString. `value` is finite.
fn js_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // value = 0.<digits> * 10^n
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let e = n - 1;
        let (first, rest) = digits.split_at(1);
        let exp_sign = if e < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{first}e{exp_sign}{}", e.unsigned_abs())
        } else {
            format!("{first}.{rest}e{exp_sign}{}", e.unsigned_abs())
        }
    };
    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorValue, OrderedMap, UniqueSet};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn native(value: Value) -> String {
        // An explicit identity callback keeps these tests independent of any
        // globally installed replacer.
        stringify(value, Some(&|_key: &str, value: Value| Ok(value)), None).unwrap()
    }

    #[test]
    fn writes_plain_shapes() {
        let value = Value::object([
            ("a", Value::from(123)),
            ("b", Value::from(1.5)),
            ("c", Value::from("x")),
            ("d", Value::Array(vec![Value::Null, Value::from(true)])),
        ]);
        assert_eq!(native(value), r#"{"a":123,"b":1.5,"c":"x","d":[null,true]}"#);
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let value = Value::Array(vec![f64::NAN.into(), f64::INFINITY.into(), (-0.0).into()]);
        assert_eq!(native(value), "[null,null,0]");
    }

    #[test]
    fn numbers_print_in_javascript_notation() {
        let cases = [
            (1e20, "100000000000000000000"),
            (1e21, "1e+21"),
            (2f64.powi(60), "1152921504606847000"),
            (-2f64.powi(60), "-1152921504606847000"),
            (1.5e-7, "1.5e-7"),
            (0.000001, "0.000001"),
            (123.456, "123.456"),
            (1.7976931348623157e308, "1.7976931348623157e+308"),
            (5e-324, "5e-324"),
            (42.0, "42"),
        ];
        for (n, expected) in cases {
            assert_eq!(native(Value::from(n)), expected, "{n:e}");
        }
    }

    #[test]
    fn pretty_output_keeps_javascript_numbers() {
        let out = stringify(Value::Array(vec![1e21.into()]), Some(&|_: &str, v: Value| Ok(v)), Some(Space::Indent(1)))
            .unwrap();
        assert_eq!(out, "[\n 1e+21\n]");
    }

    #[test]
    fn containers_degrade_to_native_forms() {
        let instant = Utc.with_ymd_and_hms(1948, 4, 25, 0, 0, 0).unwrap();
        let value = Value::object([
            ("map", Value::from(OrderedMap::new().set("x", 1))),
            ("set", Value::from(UniqueSet::new().add(1))),
            ("date", Value::from(instant)),
            ("err", Value::from(ErrorValue::new("hidden").with_field("code", 7))),
        ]);
        assert_eq!(native(value), r#"{"map":{},"set":{},"date":"1948-04-25T00:00:00.000Z","err":{"code":7}}"#);
    }

    #[test]
    fn callback_sees_root_then_children_in_order() {
        let seen = Mutex::new(Vec::new());
        let record = |key: &str, value: Value| -> Result<Value, HandlerError> {
            seen.lock().unwrap().push(key.to_string());
            Ok(value)
        };
        let value = Value::object([("a", Value::Array(vec![1.into(), 2.into()])), ("b", Value::Null)]);
        stringify(value, Some(&record), None).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["", "a", "0", "1", "b"]);
    }

    #[test]
    fn callback_result_is_traversed() {
        let expand = |key: &str, value: Value| -> Result<Value, HandlerError> {
            Ok(if key == "n" { Value::Array(vec![Value::from("k")]) } else if key == "0" { Value::from("v") } else { value })
        };
        let out = stringify(Value::object([("n", Value::Null)]), Some(&expand), None).unwrap();
        assert_eq!(out, r#"{"n":["v"]}"#);
    }

    #[test]
    fn callback_error_stops_serialization() {
        let fail = |key: &str, value: Value| -> Result<Value, HandlerError> {
            if key == "bad" { handler_err!("no {key}") } else { Ok(value) }
        };
        let err = stringify(Value::object([("ok", 1), ("bad", 2)]), Some(&fail), None).unwrap_err();
        assert_eq!(err.to_string(), "no bad");
        assert!(err.into_handler_error().is_some());
    }

    #[test]
    fn pretty_output_uses_indent_unit() {
        let value = Value::object([("a", Value::Array(vec![1.into()]))]);
        let out = stringify(value.clone(), Some(&|_: &str, v: Value| Ok(v)), Some(Space::Indent(2))).unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1\n  ]\n}");

        let tabbed = stringify(value, Some(&|_: &str, v: Value| Ok(v)), Some("\t".into())).unwrap();
        assert_eq!(tabbed, "{\n\t\"a\": [\n\t\t1\n\t]\n}");
    }

    #[test]
    fn zero_indent_is_compact() {
        let out = stringify(Value::object([("a", 1)]), Some(&|_: &str, v: Value| Ok(v)), Some(Space::Indent(0))).unwrap();
        assert_eq!(out, r#"{"a":1}"#);
    }

    #[test]
    fn indent_is_capped() {
        assert_eq!(Space::Indent(40).unit().len(), 10);
        assert_eq!(Space::Text("abcdefghijklmnop".into()).unit(), "abcdefghij");
    }
}
