//! Host value model walked by the serializer.
//!
//! `Value` covers the plain JSON shapes plus the container kinds that have no
//! direct JSON form (`Map`, `Set`, `Date`, `Error`). Handlers turn the latter
//! into plain shapes; anything left unhandled degrades to its native form in
//! [`crate::stringify`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A value about to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// Plain key-value object, insertion ordered.
    Object(IndexMap<String, Value>),
    Map(OrderedMap),
    Set(UniqueSet),
    Date(DateTime<Utc>),
    Error(ErrorValue),
}

impl Value {
    /// Short name of the variant, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Date(_) => "date",
            Value::Error(_) => "error",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Build a plain object from `(key, value)` pairs; later keys overwrite earlier ones.
    pub fn object<K, V, I>(entries: I) -> Value
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// Membership equality: SameValueZero for numbers (NaN matches NaN, 0.0 matches
// -0.0), applied at every depth.
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value_zero(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => same_entries(xs, ys),
        (Value::Map(xs), Value::Map(ys)) => same_entries(&xs.entries, &ys.entries),
        (Value::Set(xs), Value::Set(ys)) => xs == ys,
        (Value::Error(x), Value::Error(y)) => same_error(x, y),
        _ => a == b,
    }
}

fn same_error(x: &ErrorValue, y: &ErrorValue) -> bool {
    x.name == y.name
        && x.message == y.message
        && x.stack == y.stack
        && same_entries(&x.fields, &y.fields)
        && match (&x.cause, &y.cause) {
            (Some(cx), Some(cy)) => same_error(cx, cy),
            (None, None) => true,
            _ => false,
        }
}

fn same_entries(xs: &IndexMap<String, Value>, ys: &IndexMap<String, Value>) -> bool {
    xs.len() == ys.len() && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| same_value_zero(x, y)))
}

// Hash consistent with `same_value_zero`: NaN and -0.0 are canonicalized, and
// keyed or set-like containers combine their entries order-independently.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(n) => canonical_bits(*n).hash(state),
        Value::String(s) => s.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => hash_entries(map, state),
        Value::Map(map) => hash_entries(&map.entries, state),
        Value::Set(set) => {
            set.len().hash(state);
            set.iter().map(fingerprint).fold(0u64, u64::wrapping_add).hash(state);
        }
        Value::Date(instant) => instant.hash(state),
        Value::Error(err) => {
            err.name.hash(state);
            err.message.hash(state);
        }
    }
}

fn hash_entries<H: Hasher>(map: &IndexMap<String, Value>, state: &mut H) {
    map.len().hash(state);
    map.iter()
        .map(|(k, v)| {
            let mut entry = DefaultHasher::new();
            k.hash(&mut entry);
            hash_value(v, &mut entry);
            entry.finish()
        })
        .fold(0u64, u64::wrapping_add)
        .hash(state);
}

fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

fn fingerprint(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}

// --- Containers --------------------------------------------------------------

/// Ordered key-unique mapping.
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position, so iteration order is first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap {
    entries: IndexMap<String, Value>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. Returns `self` so calls can be chained.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl IntoIterator for OrderedMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OrderedMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Collection of unique values in insertion order.
///
/// Members are compared structurally; numbers use SameValueZero at any depth.
/// A fingerprint index keeps `insert` and `contains` close to constant time.
#[derive(Clone, Default)]
pub struct UniqueSet {
    members: Vec<Value>,
    index: HashMap<u64, Vec<usize>>,
}

impl UniqueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` unless an equal member is already present. Returns `self`.
    pub fn add(mut self, value: impl Into<Value>) -> Self {
        self.insert(value);
        self
    }

    /// Returns `true` if the value was newly inserted.
    pub fn insert(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        let key = fingerprint(&value);
        if self.position(key, &value).is_some() {
            return false;
        }
        self.index.entry(key).or_default().push(self.members.len());
        self.members.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.position(fingerprint(value), value).is_some()
    }

    fn position(&self, key: u64, value: &Value) -> Option<usize> {
        self.index.get(&key)?.iter().copied().find(|&slot| same_value_zero(&self.members[slot], value))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.members.iter()
    }
}

impl std::fmt::Debug for UniqueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(&self.members).finish()
    }
}

// Set equality ignores order, like comparing two sets member-wise.
impl PartialEq for UniqueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.members.iter().all(|m| other.contains(m))
    }
}

impl IntoIterator for UniqueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for UniqueSet {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut set = UniqueSet::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

// --- Errors ------------------------------------------------------------------

/// An error object as it appears in a value tree.
///
/// `name`, `message` and `stack` are the well-known properties; `fields`
/// holds any extra structural data attached to the error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
    pub fields: IndexMap<String, Value>,
    pub cause: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self { name: "Error".to_string(), message: message.into(), stack: None, fields: IndexMap::new(), cause: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: ErrorValue) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Capture a Rust error, turning its `source()` chain into nested causes.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut value = ErrorValue::new(err.to_string());
        if let Some(source) = err.source() {
            value.cause = Some(Box::new(ErrorValue::from_error(source)));
        }
        value
    }
}

// --- Conversions -------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(n as f64)
            }
        })*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<OrderedMap> for Value {
    fn from(map: OrderedMap) -> Self {
        Value::Map(map)
    }
}

impl From<UniqueSet> for Value {
    fn from(set: UniqueSet) -> Self {
        Value::Set(set)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(instant: DateTime<Utc>) -> Self {
        Value::Date(instant)
    }
}

impl From<ErrorValue> for Value {
    fn from(err: ErrorValue) -> Self {
        Value::Error(err)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_map_replaces_in_place() {
        let map = OrderedMap::new().set("x", 1).set("y", 2).set("x", 3);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(map.get("x"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn unique_set_drops_duplicates() {
        let set = UniqueSet::new().add("a").add("b").add("a");
        assert_eq!(set.len(), 2);
        let members: Vec<Value> = set.into_iter().collect();
        assert_eq!(members, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn unique_set_treats_nan_as_one_member() {
        let set = UniqueSet::new().add(f64::NAN).add(f64::NAN).add(0.0).add(-0.0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn unique_set_compares_nested_members_by_same_value_zero() {
        let set = UniqueSet::new()
            .add(Value::Array(vec![f64::NAN.into()]))
            .add(Value::Array(vec![f64::NAN.into()]))
            .add(Value::object([("z", -0.0)]))
            .add(Value::object([("z", 0.0)]));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Value::Array(vec![f64::NAN.into()])));
    }

    #[test]
    fn unique_set_keys_objects_regardless_of_member_order() {
        let set = UniqueSet::new().add(Value::object([("a", 1), ("b", 2)])).add(Value::object([("b", 2), ("a", 1)]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn unique_set_handles_many_members() {
        let set: UniqueSet = (0..20_000).chain(0..20_000).collect();
        assert_eq!(set.len(), 20_000);
        assert!(set.contains(&Value::from(19_999)));
        assert!(!set.contains(&Value::from(20_000)));
    }

    #[test]
    fn set_equality_ignores_order() {
        let a: UniqueSet = [1, 2, 3].into_iter().collect();
        let b: UniqueSet = [3, 1, 2].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn error_value_follows_source_chain() {
        #[derive(Debug)]
        struct Outer(std::io::Error);

        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "outer failed")
            }
        }

        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let err = Outer(std::io::Error::other("disk gone"));
        let value = ErrorValue::from_error(&err);
        assert_eq!(value.message, "outer failed");
        assert_eq!(value.cause.as_ref().map(|c| c.message.as_str()), Some("disk gone"));
    }
}
