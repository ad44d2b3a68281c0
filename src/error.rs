//! Error types.
//!
//! Handler failures travel as a boxed [`HandlerError`] so a caller gets back
//! exactly what its handler returned. The serializer and the settings loader
//! have their own enums.

/// Error returned by a handler's `transform` (or any replacer callback).
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StringifyError {
    /// A replacer callback failed; displayed exactly as the original error.
    #[error(transparent)]
    Handler(HandlerError),

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StringifyError {
    /// Recover the original handler error, if that is what failed.
    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            StringifyError::Handler(err) => Some(err),
            StringifyError::Json(_) => None,
        }
    }
}

impl From<HandlerError> for StringifyError {
    fn from(err: HandlerError) -> Self {
        StringifyError::Handler(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid settings document: {0}")]
    Document(#[from] serde_json::Error),
}
