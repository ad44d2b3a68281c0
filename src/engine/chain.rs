//! Handler chain assembly.
//!
//! This is the *static* side of the engine: a `HandlerChain` is derived once
//! from a configuration and never changes afterwards.
//!
//! ```text
//! custom handlers (caller order) ──┐
//!                                  ├──▶ HandlerChain ──▶ resolve (resolve.rs)
//! enabled built-ins (table order) ─┘        └─ implicit pass-through at the end
//! ```
//!
//! ## Invariants
//!
//! - Custom handlers always come before built-ins, so a custom handler that
//!   accepts the same value as a built-in wins.
//! - The custom sequence is copied (shallowly, by `Arc`) at assembly time; the
//!   caller's vector can be changed afterwards without affecting the chain.

use super::builtins::{BUILT_IN_TABLE, BuiltIns};
use crate::Handler;
use std::sync::Arc;

/// Immutable, ordered list of handlers. Earlier entries take priority.
pub(crate) struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
    custom_len: usize,
    built_ins: BuiltIns,
}

impl HandlerChain {
    pub(crate) fn new(custom: &[Arc<dyn Handler>], built_ins: BuiltIns) -> Self {
        let mut handlers: Vec<Arc<dyn Handler>> = custom.to_vec();
        let custom_len = handlers.len();

        handlers.extend(
            BUILT_IN_TABLE.iter().filter(|(kind, _)| built_ins.contains(*kind)).map(|(_, handler)| Arc::clone(handler)),
        );

        tracing::debug!(custom = custom_len, built_ins = ?built_ins, total = handlers.len(), "assembled handler chain");

        HandlerChain { handlers, custom_len, built_ins }
    }

    pub(crate) fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    pub(crate) fn custom_len(&self) -> usize {
        self.custom_len
    }

    pub(crate) fn built_ins(&self) -> BuiltIns {
        self.built_ins
    }

    pub(crate) fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("handlers", &self.names())
            .field("custom_len", &self.custom_len)
            .field("built_ins", &self.built_ins)
            .finish()
    }
}
