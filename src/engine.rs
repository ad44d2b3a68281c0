//! Handler resolution engine.
//!
//! The engine turns a configuration into a single resolution function. It is
//! split into small submodules:
//!
//! ```text
//! Options ──▶ HandlerChain::new            (chain.rs)
//!               - custom handlers, copied
//!               - enabled built-ins        (builtins.rs)
//!                       │
//!                       ▼
//!             resolve(chain, key, value)   (resolve.rs)
//!               - first match wins
//!               - otherwise pass-through
//!                       │
//!                       ▼ (opt-in)
//!             install as global default    (intercept.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `builtins.rs`: the four stateless built-in handlers and the `BuiltIns`
//!   flags that select them.
//! - `chain.rs`: assembles the immutable, ordered `HandlerChain`.
//! - `resolve.rs`: scans the chain for one `(key, value)` pair.
//! - `intercept.rs`: the process-wide slot consulted by `stringify` when no
//!   callback is given.
//!
//! ## Adding a built-in
//!
//! Add a `BuiltIns` bit, implement `Handler` for the new type, and append it
//! to `BUILT_IN_TABLE` at the position it should take in the chain.

#[path = "engine/builtins.rs"]
mod builtins;
#[path = "engine/chain.rs"]
mod chain;
#[path = "engine/intercept.rs"]
mod intercept;
#[path = "engine/resolve.rs"]
mod resolve;


pub use builtins::{BuiltIns, ErrorHandler, OrderedMapHandler, TemporalHandler, UniqueSetHandler};
pub(crate) use chain::HandlerChain;
pub(crate) use intercept::{install, installed};
pub use intercept::is_intercepting;
pub(crate) use resolve::resolve;
