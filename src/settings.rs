//! Loadable configuration.
//!
//! [`Settings`] is the serializable half of [`Options`]: everything except the
//! custom handlers, which only exist in code. Unknown keys are ignored and
//! missing keys take their defaults.
//!
//! Keys may be snake_case or camelCase. The `config` crate lowercases keys it
//! reads from files, so every camelCase alias also has an all-lowercase twin.

use crate::engine::BuiltIns;
use crate::{Handler, Options, SettingsError};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const ENV_PREFIX: &str = "JSON_REPLACER";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "useErrorHandler", alias = "useerrorhandler")]
    pub use_error_handler: bool,
    #[serde(alias = "useTemporalHandler", alias = "usetemporalhandler")]
    pub use_temporal_handler: bool,
    #[serde(alias = "useMapHandler", alias = "usemaphandler")]
    pub use_map_handler: bool,
    #[serde(alias = "useSetHandler", alias = "usesethandler")]
    pub use_set_handler: bool,
    /// Master switch. `Some(false)` disables every built-in regardless of the
    /// per-kind flags.
    #[serde(alias = "useBuiltInHandlers", alias = "usebuiltinhandlers")]
    pub use_built_in_handlers: Option<bool>,
    #[serde(alias = "interceptGlobalSerializer", alias = "interceptglobalserializer")]
    pub intercept_global_serializer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_error_handler: true,
            use_temporal_handler: true,
            use_map_handler: true,
            use_set_handler: true,
            use_built_in_handlers: None,
            intercept_global_serializer: false,
        }
    }
}

impl Settings {
    /// Merge a JSON document over the defaults.
    pub fn from_json(document: &serde_json::Value) -> Result<Self, SettingsError> {
        Ok(Settings::deserialize(document)?)
    }

    /// Load from an optional file (any format the `config` crate knows by
    /// extension), overridden by `JSON_REPLACER_*` environment variables.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let settings: Settings = builder.build()?.try_deserialize()?;
        tracing::debug!(settings = ?settings, "loaded replacer settings");
        Ok(settings)
    }

    /// Which built-ins these settings enable.
    pub fn built_ins(&self) -> BuiltIns {
        if self.use_built_in_handlers == Some(false) {
            return BuiltIns::empty();
        }

        let mut kinds = BuiltIns::empty();
        kinds.set(BuiltIns::ERROR, self.use_error_handler);
        kinds.set(BuiltIns::TEMPORAL, self.use_temporal_handler);
        kinds.set(BuiltIns::MAP, self.use_map_handler);
        kinds.set(BuiltIns::SET, self.use_set_handler);
        kinds
    }

    pub fn into_options(self, custom_handlers: Vec<Arc<dyn Handler>>) -> Options {
        Options { custom_handlers, built_ins: self.built_ins(), intercept_global_serializer: self.intercept_global_serializer }
    }
}
