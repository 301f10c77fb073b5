//! Domain layer: handlers, handler sets, vocabularies, and the scope index.
//!
//! These are the building blocks the three buses in [`crate::bus`] are
//! made of. None of them invokes a handler; dispatch lives in the buses.

pub mod handler;
pub mod handler_set;
pub mod registry_core;
pub mod scope_id;
pub mod scope_index;
pub mod vocabulary;

pub use handler::Handler;
pub use handler_set::HandlerSet;
pub use registry_core::RegistryCore;
pub use scope_id::ScopeId;
pub use scope_index::{ScopeEntries, ScopeIndex};
pub use vocabulary::Vocabulary;
