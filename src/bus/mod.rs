//! The three event buses.
//!
//! - [`EventBus`]: any event type, no scopes.
//! - [`ScopedRegistry`]: declared vocabulary, scoped bulk revocation,
//!   state owned by the instance.
//! - [`SharedScopedRegistry`]: same contract as [`ScopedRegistry`], state
//!   shared by all handles of one declaration.
//!
//! All three dispatch synchronously on the caller's thread and are
//! neither `Send` nor `Sync`.

pub mod scoped;
pub mod shared;
pub mod unscoped;

pub use scoped::ScopedRegistry;
pub use shared::SharedScopedRegistry;
pub use unscoped::EventBus;
