//! Built-in handlers.
//!
//! Each built-in owns exactly one [`Value`] variant. They are stateless, so a
//! single shared instance of each lives in [`BUILT_IN_TABLE`] and every chain
//! reuses it.
//!
//! ```text
//! BuiltIns::ERROR    -> ErrorHandler       Error(..) -> plain object
//! BuiltIns::TEMPORAL -> TemporalHandler    Date(..)  -> ISO-8601 string
//! BuiltIns::MAP      -> OrderedMapHandler  Map(..)   -> plain object
//! BuiltIns::SET      -> UniqueSetHandler   Set(..)   -> array
//! ```
//!
//! The table order is the chain order.

use crate::error_object::serialize_error;
use crate::{Handler, HandlerError, Value};
use chrono::{Datelike, SecondsFormat};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

bitflags::bitflags! {
    /// Which built-in handlers a chain includes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BuiltIns: u8 {
        const ERROR    = 1 << 0;
        const TEMPORAL = 1 << 1;
        const MAP      = 1 << 2;
        const SET      = 1 << 3;
    }
}

impl Default for BuiltIns {
    fn default() -> Self {
        BuiltIns::all()
    }
}

pub(crate) static BUILT_IN_TABLE: Lazy<[(BuiltIns, Arc<dyn Handler>); 4]> = Lazy::new(|| {
    [
        (BuiltIns::ERROR, Arc::new(ErrorHandler) as Arc<dyn Handler>),
        (BuiltIns::TEMPORAL, Arc::new(TemporalHandler) as Arc<dyn Handler>),
        (BuiltIns::MAP, Arc::new(OrderedMapHandler) as Arc<dyn Handler>),
        (BuiltIns::SET, Arc::new(UniqueSetHandler) as Arc<dyn Handler>),
    ]
});

/// Turns error objects into plain objects via [`serialize_error`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorHandler;

impl Handler for ErrorHandler {
    fn can_handle(&self, _key: &str, value: &Value) -> bool {
        matches!(value, Value::Error(_))
    }

    fn transform(&self, _key: &str, value: Value) -> Result<Value, HandlerError> {
        match value {
            Value::Error(err) => Ok(serialize_error(&err)),
            other => Ok(other),
        }
    }

    fn name(&self) -> &str {
        "error"
    }
}

/// Renders instants as `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Years outside `0..=9999` use the expanded form with a sign and six digits,
/// e.g. `-000001-01-01T00:00:00.000Z` or `+010000-01-01T00:00:00.000Z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalHandler;

impl TemporalHandler {
    pub(crate) fn canonical(instant: &chrono::DateTime<chrono::Utc>) -> String {
        let year = instant.year();
        if (0..=9999).contains(&year) {
            return instant.to_rfc3339_opts(SecondsFormat::Millis, true);
        }
        let sign = if year < 0 { '-' } else { '+' };
        format!("{sign}{:06}-{}", year.unsigned_abs(), instant.format("%m-%dT%H:%M:%S%.3fZ"))
    }
}

impl Handler for TemporalHandler {
    fn can_handle(&self, _key: &str, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }

    fn transform(&self, _key: &str, value: Value) -> Result<Value, HandlerError> {
        match value {
            Value::Date(instant) => Ok(Value::String(Self::canonical(&instant))),
            other => Ok(other),
        }
    }

    fn name(&self) -> &str {
        "temporal"
    }
}

/// Flattens an ordered map into a plain object.
///
/// Entries are inserted in iteration order; a key that repeats one already
/// present overwrites it.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedMapHandler;

impl Handler for OrderedMapHandler {
    fn can_handle(&self, _key: &str, value: &Value) -> bool {
        matches!(value, Value::Map(_))
    }

    fn transform(&self, _key: &str, value: Value) -> Result<Value, HandlerError> {
        match value {
            Value::Map(map) => {
                let object = map.into_iter().fold(IndexMap::new(), |mut agg, (k, v)| {
                    agg.insert(k, v);
                    agg
                });
                Ok(Value::Object(object))
            }
            other => Ok(other),
        }
    }

    fn name(&self) -> &str {
        "map"
    }
}

/// Lists the members of a unique set as an array.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueSetHandler;

impl Handler for UniqueSetHandler {
    fn can_handle(&self, _key: &str, value: &Value) -> bool {
        matches!(value, Value::Set(_))
    }

    fn transform(&self, _key: &str, value: Value) -> Result<Value, HandlerError> {
        match value {
            Value::Set(set) => Ok(Value::Array(set.into_iter().collect())),
            other => Ok(other),
        }
    }

    fn name(&self) -> &str {
        "set"
    }
}
