use crate::engine::{self, BuiltIns, HandlerChain};
use crate::stringify::{Space, stringify};
use crate::{Handler, HandlerError, StringifyError, Value};
use std::sync::Arc;

/// Configuration read once by [`create_replacer`].
///
/// Defaults: no custom handlers, every built-in enabled, no global
/// interception.
///
/// # Example
/// ```
/// use json_replacer::{Options, handler};
///
/// let options = Options::default()
///     .use_set_handler(false)
///     .with_handler(handler! {
///         name: "redact",
///         test: |key, _value| key == "password",
///         transform: |_key, _value| Ok("***".into()),
///     });
/// assert_eq!(options.custom_handlers.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Options {
    /// Evaluated before any built-in, in this order.
    pub custom_handlers: Vec<Arc<dyn Handler>>,
    pub built_ins: BuiltIns,
    /// Install the replacer as the default for [`stringify`] calls that pass
    /// no callback. See [`crate::is_intercepting`].
    pub intercept_global_serializer: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.custom_handlers.push(Arc::new(handler));
        self
    }

    pub fn with_handlers(mut self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) -> Self {
        self.custom_handlers.extend(handlers);
        self
    }

    pub fn use_error_handler(self, enabled: bool) -> Self {
        self.toggle(BuiltIns::ERROR, enabled)
    }

    pub fn use_temporal_handler(self, enabled: bool) -> Self {
        self.toggle(BuiltIns::TEMPORAL, enabled)
    }

    pub fn use_map_handler(self, enabled: bool) -> Self {
        self.toggle(BuiltIns::MAP, enabled)
    }

    pub fn use_set_handler(self, enabled: bool) -> Self {
        self.toggle(BuiltIns::SET, enabled)
    }

    /// Enable or disable every built-in at once.
    pub fn use_built_in_handlers(self, enabled: bool) -> Self {
        self.toggle(BuiltIns::all(), enabled)
    }

    pub fn intercept_global_serializer(mut self, enabled: bool) -> Self {
        self.intercept_global_serializer = enabled;
        self
    }

    fn toggle(mut self, kinds: BuiltIns, enabled: bool) -> Self {
        self.built_ins.set(kinds, enabled);
        self
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.custom_handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("Options")
            .field("custom_handlers", &names)
            .field("built_ins", &self.built_ins)
            .field("intercept_global_serializer", &self.intercept_global_serializer)
            .finish()
    }
}

/// The resolution function: maps `(key, value)` to the value to serialize.
///
/// Cloning is cheap and clones share the same immutable chain, so a
/// `Replacer` can be used from many threads at once. Only custom handlers that
/// carry their own mutable state need synchronization.
#[derive(Clone)]
pub struct Replacer {
    chain: Arc<HandlerChain>,
}

impl Replacer {
    /// Transform `value` with the first handler that accepts it, or return it
    /// unchanged. A handler error is returned exactly as the handler produced it.
    pub fn resolve(&self, key: &str, value: Value) -> Result<Value, HandlerError> {
        engine::resolve(&self.chain, key, value)
    }

    /// Serialize `value` using this replacer as the per-node callback.
    pub fn stringify(&self, value: Value, space: Option<Space>) -> Result<String, StringifyError> {
        stringify(value, Some(&|key: &str, value: Value| self.resolve(key, value)), space)
    }

    /// Handler names in evaluation order.
    pub fn handler_names(&self) -> Vec<&str> {
        self.chain.names()
    }

    pub fn custom_handler_count(&self) -> usize {
        self.chain.custom_len()
    }

    pub fn built_ins(&self) -> BuiltIns {
        self.chain.built_ins()
    }
}

impl std::fmt::Debug for Replacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Replacer").field("chain", &self.chain).finish()
    }
}

/// Build a [`Replacer`] from `options`.
///
/// The custom handler list is copied, so later changes to `options` have no
/// effect on the returned replacer. When `options.intercept_global_serializer`
/// is set, the replacer is also installed as the process-wide default for
/// [`stringify`]; the last installed replacer wins.
pub fn create_replacer(options: &Options) -> Replacer {
    let chain = HandlerChain::new(&options.custom_handlers, options.built_ins);
    let replacer = Replacer { chain: Arc::new(chain) };

    if options.intercept_global_serializer {
        engine::install(replacer.clone());
    }

    replacer
}

/// Build a [`Replacer`] with default options.
pub fn create_replacer_default() -> Replacer {
    create_replacer(&Options::default())
}
