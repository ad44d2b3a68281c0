//! Chain-of-responsibility replacer for JSON serialization.
//!
//! A [`Replacer`] is built once from [`Options`]: caller-supplied handlers
//! first, then the enabled built-ins (errors, dates, ordered maps, unique
//! sets). For each `(key, value)` the serializer visits, the first handler
//! whose test accepts transforms the value; otherwise the value passes through
//! unchanged.
//!
//! ```
//! use json_replacer::{Options, UniqueSet, Value, create_replacer};
//!
//! let replacer = create_replacer(&Options::default());
//! let tags = UniqueSet::new().add("a").add("b").add("a");
//! let json = replacer.stringify(Value::object([("tags", tags)]), None).unwrap();
//! assert_eq!(json, r#"{"tags":["a","b"]}"#);
//! ```

extern crate self as json_replacer;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
pub mod error_object;
mod settings;
mod stringify;
mod value;

pub use api::{Options, Replacer, create_replacer, create_replacer_default};
pub use engine::{BuiltIns, ErrorHandler, OrderedMapHandler, TemporalHandler, UniqueSetHandler, is_intercepting};
pub use error::{HandlerError, SettingsError, StringifyError};
pub use settings::Settings;
pub use stringify::{ReplacerFn, Space, stringify};
pub use value::{ErrorValue, OrderedMap, UniqueSet, Value};

// --- Handler contract ---------------------------------------------------------

/// One link of the chain: a capability test plus a transform.
///
/// `transform` is only called after `can_handle` returned `true` for the same
/// key and value. `can_handle` must be free of side effects.
pub trait Handler: Send + Sync {
    fn can_handle(&self, key: &str, value: &Value) -> bool;

    fn transform(&self, key: &str, value: Value) -> Result<Value, HandlerError>;

    /// Name used in log events.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A [`Handler`] made of two closures. Usually built with [`handler!`].
pub struct FnHandler<T, X> {
    name: &'static str,
    test: T,
    transform: X,
}

impl<T, X> FnHandler<T, X>
where
    T: Fn(&str, &Value) -> bool + Send + Sync,
    X: Fn(&str, Value) -> Result<Value, HandlerError> + Send + Sync,
{
    pub fn new(name: &'static str, test: T, transform: X) -> Self {
        Self { name, test, transform }
    }
}

impl<T, X> Handler for FnHandler<T, X>
where
    T: Fn(&str, &Value) -> bool + Send + Sync,
    X: Fn(&str, Value) -> Result<Value, HandlerError> + Send + Sync,
{
    fn can_handle(&self, key: &str, value: &Value) -> bool {
        (self.test)(key, value)
    }

    fn transform(&self, key: &str, value: Value) -> Result<Value, HandlerError> {
        (self.transform)(key, value)
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl<T, X> std::fmt::Debug for FnHandler<T, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .field("test", &"<function>")
            .field("transform", &"<function>")
            .finish()
    }
}
