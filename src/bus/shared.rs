//! Registry shared by every handle created from one declaration.
//!
//! [`SharedScopedRegistry::declare`] creates exactly one registry for the
//! given vocabulary and returns a handle to it. Cloning the handle, or
//! calling [`SharedScopedRegistry::handle`], yields more handles to the
//! same registry: a subscription made through any of them is seen by an
//! emit through any other. Declaring again with the same event types
//! creates a separate registry.
//!
//! Handles dereference to [`ScopedRegistry`], so the operations and their
//! semantics are exactly those of the per-instance variant.

use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::rc::Rc;

use super::ScopedRegistry;
use crate::config::RegistryConfig;
use crate::domain::{ScopeId, Vocabulary};
use crate::error::BusError;

/// Handle to a registry owned jointly by all handles of its declaration.
///
/// The registry lives until the last handle is dropped.
pub struct SharedScopedRegistry<K = String, P: ?Sized = (), S = ScopeId> {
    registry: Rc<ScopedRegistry<K, P, S>>,
}

impl<K, P, S> SharedScopedRegistry<K, P, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: ?Sized,
    S: Eq + Hash + fmt::Debug,
{
    /// Creates a new registry over `vocabulary` and returns the first
    /// handle to it.
    #[must_use]
    pub fn new(vocabulary: Vocabulary<K>) -> Self {
        Self::with_config(vocabulary, RegistryConfig::default())
    }

    /// Like [`SharedScopedRegistry::new`] with an explicit config.
    #[must_use]
    pub fn with_config(vocabulary: Vocabulary<K>, config: RegistryConfig) -> Self {
        let registry = ScopedRegistry::with_config(vocabulary, config);
        tracing::debug!(types = registry.vocabulary().len(), "shared registry declared");
        Self {
            registry: Rc::new(registry),
        }
    }

    /// Declares the vocabulary and creates its registry in one step.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::EmptyVocabulary`] if `types` is empty.
    pub fn declare<I>(types: I) -> Result<Self, BusError>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        Vocabulary::new(types).map(Self::new)
    }

    /// Returns another handle to the same registry.
    #[must_use]
    pub fn handle(&self) -> Self {
        self.clone()
    }

    /// Returns `true` if both handles come from the same declaration.
    #[must_use]
    pub fn same_declaration(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }

    /// Number of live handles to this registry, `self` included.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.registry)
    }
}

impl<K, P: ?Sized, S> Clone for SharedScopedRegistry<K, P, S> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<K, P: ?Sized, S> Deref for SharedScopedRegistry<K, P, S> {
    type Target = ScopedRegistry<K, P, S>;

    fn deref(&self) -> &Self::Target {
        &self.registry
    }
}

impl<K, P, S> fmt::Debug for SharedScopedRegistry<K, P, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: ?Sized,
    S: Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedScopedRegistry")
            .field("handles", &self.handle_count())
            .field("registry", &*self.registry)
            .finish()
    }
}
