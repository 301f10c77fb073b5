//! Secondary index from scope token to the registrations made under it.
//!
//! A pair `(event type, handler)` is listed under scope `S` for every
//! scoped subscription made with `S` that has not since been revoked.
//! The index is not reconciled against the handler sets: a pair removed
//! directly from its set stays listed until the scope is revoked or the
//! pair is explicitly scrubbed.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::Handler;

/// Ordered registrations recorded under a single scope.
pub type ScopeEntries<K, P> = Vec<(K, Handler<P>)>;

/// Mapping from scope token to its recorded registrations.
#[derive(Debug)]
pub struct ScopeIndex<K, P: ?Sized, S> {
    scopes: HashMap<S, ScopeEntries<K, P>>,
}

impl<K, P, S> ScopeIndex<K, P, S>
where
    K: Eq,
    P: ?Sized,
    S: Eq + Hash,
{
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }

    /// Appends `(event_type, handler)` to `scope`, creating the entry on
    /// first use. Duplicates are kept.
    pub fn record(&mut self, scope: S, event_type: K, handler: &Handler<P>) {
        self.scopes
            .entry(scope)
            .or_default()
            .push((event_type, handler.clone()));
    }

    /// Removes the entry for `scope` and returns what it recorded.
    pub fn take(&mut self, scope: &S) -> Option<ScopeEntries<K, P>> {
        self.scopes.remove(scope)
    }

    /// Drops every record of `(event_type, handler)` from all scopes.
    /// Scopes left without records are removed. Returns the number of
    /// records dropped.
    pub fn scrub<Q>(&mut self, event_type: &Q, handler: &Handler<P>) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut dropped = 0;
        self.scopes.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|(ty, h)| !(ty.borrow() == event_type && h.same_as(handler)));
            dropped += before - entries.len();
            !entries.is_empty()
        });
        dropped
    }

    /// Returns `true` if `scope` has an entry.
    #[must_use]
    pub fn contains(&self, scope: &S) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Number of records under `scope`, stale ones included.
    #[must_use]
    pub fn records(&self, scope: &S) -> usize {
        self.scopes.get(scope).map_or(0, Vec::len)
    }

    /// Number of scopes with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` if no scope has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl<K, P, S> Default for ScopeIndex<K, P, S>
where
    K: Eq,
    P: ?Sized,
    S: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
