//! # bussin
//!
//! Synchronous, in-process publish/subscribe for a single thread of
//! control. Components register handlers for named event types,
//! producers emit events with a payload, and every matching handler is
//! invoked before `emit` returns.
//!
//! ## Architecture
//!
//! ```text
//! Callers (UI components, object lifecycles, simulation steps)
//!     │
//!     ├── EventBus (bus/)               open vocabulary, no scopes
//!     ├── ScopedRegistry (bus/)         declared vocabulary + scopes
//!     └── SharedScopedRegistry (bus/)   one ScopedRegistry per declaration,
//!             │                         many handles
//!             │
//!             └── RegistryCore (domain/)
//!                     ├── HandlerSet per declared event type
//!                     └── ScopeIndex: scope → [(event type, handler)]
//! ```
//!
//! ## Semantics shared by all buses
//!
//! - Handlers are compared by identity ([`domain::Handler`] clones are the
//!   same handler); subscribing twice is a no-op.
//! - `emit` snapshots the handler set, then calls each handler once with
//!   a reference to the payload. Changes made by handlers during the pass
//!   apply from the next emit on.
//! - A panicking handler propagates out of `emit`; the remaining handlers
//!   of that pass are not called.
//! - Unknown event types, handlers, and scopes are silently ignored.

pub mod bus;
pub mod config;
pub mod domain;
pub mod error;

pub use bus::{EventBus, ScopedRegistry, SharedScopedRegistry};
pub use config::{RegistryConfig, UndeclaredPolicy};
pub use domain::{Handler, ScopeId, Vocabulary};
pub use error::BusError;
