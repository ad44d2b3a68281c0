//! Per-node resolution.
//!
//! ```text
//! (key, value) ──▶ handler[0].can_handle? ──yes──▶ handler[0].transform
//!                        │ no
//!                        ▼
//!                  handler[1].can_handle? ...
//!                        │ none
//!                        ▼
//!                  value, unchanged
//! ```
//!
//! Exactly one transform runs per call. Its error, if any, is returned as is.

use super::chain::HandlerChain;
use crate::{HandlerError, Value};

pub(crate) fn resolve(chain: &HandlerChain, key: &str, value: Value) -> Result<Value, HandlerError> {
    let matched = chain.handlers().iter().find(|h| h.can_handle(key, &value));
    match matched {
        Some(handler) => {
            tracing::trace!(key, kind = value.kind(), handler = handler.name(), "handler matched");
            handler.transform(key, value)
        }
        None => Ok(value),
    }
}
