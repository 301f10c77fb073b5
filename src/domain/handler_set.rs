//! Identity set of handlers for a single event type.

use super::Handler;

/// Set of handlers subscribed to one event type.
///
/// Membership is by handler identity. Insertion order is kept so that
/// emission is deterministic, but callers must not rely on it.
#[derive(Debug)]
pub struct HandlerSet<P: ?Sized> {
    handlers: Vec<Handler<P>>,
}

impl<P: ?Sized> HandlerSet<P> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Adds `handler`. Returns `false` if it was already a member.
    pub fn insert(&mut self, handler: &Handler<P>) -> bool {
        if self.contains(handler) {
            return false;
        }
        self.handlers.push(handler.clone());
        true
    }

    /// Removes `handler`. Returns `false` if it was not a member.
    pub fn remove(&mut self, handler: &Handler<P>) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| !h.same_as(handler));
        self.handlers.len() != before
    }

    /// Returns `true` if `handler` is a member.
    #[must_use]
    pub fn contains(&self, handler: &Handler<P>) -> bool {
        self.handlers.iter().any(|h| h.same_as(handler))
    }

    /// Copies the current members so they can be invoked without holding
    /// a borrow on the set.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Handler<P>> {
        self.handlers.clone()
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<P: ?Sized> Default for HandlerSet<P> {
    fn default() -> Self {
        Self::new()
    }
}
