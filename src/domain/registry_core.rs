//! Handler sets over a declared vocabulary plus a scope index.
//!
//! [`RegistryCore`] holds all the state and bookkeeping of the scoped
//! registries. Mutation goes through plain `&mut self` methods; handlers
//! are only ever invoked by [`RegistryCore::dispatch`], which works on a
//! snapshot taken under a short-lived borrow.

use std::borrow::Borrow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use super::{Handler, HandlerSet, ScopeEntries, ScopeIndex, Vocabulary};
use crate::config::{RegistryConfig, UndeclaredPolicy};
use crate::error::BusError;

/// State shared by [`crate::bus::ScopedRegistry`] and
/// [`crate::bus::SharedScopedRegistry`].
///
/// # Invariants
///
/// - `sets` has exactly one entry per declared event type, from
///   construction on. No other key is ever inserted.
/// - A pair is recorded under a scope iff it was subscribed with that
///   scope and neither the scope was revoked since nor the pair scrubbed.
#[derive(Debug)]
pub struct RegistryCore<K, P: ?Sized, S> {
    vocabulary: Vocabulary<K>,
    sets: HashMap<K, HandlerSet<P>>,
    scopes: ScopeIndex<K, P, S>,
    config: RegistryConfig,
}

impl<K, P, S> RegistryCore<K, P, S>
where
    K: Eq + Hash + Clone + Debug,
    P: ?Sized,
    S: Eq + Hash + Debug,
{
    /// Creates a core with an empty handler set per declared type.
    #[must_use]
    pub fn new(vocabulary: Vocabulary<K>, config: RegistryConfig) -> Self {
        let sets = vocabulary
            .iter()
            .map(|ty| (ty.clone(), HandlerSet::new()))
            .collect();
        Self {
            vocabulary,
            sets,
            scopes: ScopeIndex::new(),
            config,
        }
    }

    /// Adds `handler` to `event_type` and, if given, records the pair
    /// under `scope`.
    ///
    /// Returns `false` without touching any state if `event_type` is not
    /// declared. The pair is recorded under `scope` even when the handler
    /// was already subscribed.
    pub fn subscribe(&mut self, event_type: K, handler: &Handler<P>, scope: Option<S>) -> bool {
        let Some(set) = self.sets.get_mut(&event_type) else {
            if self.config.undeclared_policy == UndeclaredPolicy::Warn {
                tracing::warn!(?event_type, "ignoring subscription to undeclared event type");
            }
            return false;
        };

        let added = set.insert(handler);
        tracing::trace!(?event_type, added, scoped = scope.is_some(), "subscribe");
        if let Some(scope) = scope {
            self.scopes.record(scope, event_type, handler);
        }
        true
    }

    /// Removes `handler` from `event_type`. Returns `true` if it was
    /// subscribed.
    ///
    /// Scope records of the pair are left in place unless the config
    /// asks for them to be scrubbed.
    pub fn unsubscribe<Q>(&mut self, event_type: &Q, handler: &Handler<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + Debug + ?Sized,
    {
        let Some(set) = self.sets.get_mut(event_type) else {
            return false;
        };

        let removed = set.remove(handler);
        if self.config.scrub_scopes_on_unsubscribe {
            let scrubbed = self.scopes.scrub(event_type, handler);
            tracing::trace!(?event_type, removed, scrubbed, "unsubscribe");
        } else {
            tracing::trace!(?event_type, removed, "unsubscribe");
        }
        removed
    }

    /// Removes every handler recorded under `scope` from its event type
    /// and deletes the scope.
    ///
    /// Returns how many handlers were actually removed (stale and
    /// duplicate records count zero) together with the scope's records.
    /// The records may hold the last clone of a removed handler; callers
    /// drop them only after releasing their borrow of the core, since a
    /// handler's captured state may touch the registry when dropped.
    pub fn revoke_scope(&mut self, scope: &S) -> (usize, ScopeEntries<K, P>) {
        let Some(entries) = self.scopes.take(scope) else {
            return (0, Vec::new());
        };

        let recorded = entries.len();
        let mut removed = 0;
        for (event_type, handler) in &entries {
            if let Some(set) = self.sets.get_mut(event_type)
                && set.remove(handler)
            {
                removed += 1;
            }
        }
        tracing::debug!(?scope, recorded, removed, "scope revoked");
        (removed, entries)
    }

    /// Checks that `event_type` is declared.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UndeclaredEventType`] otherwise.
    pub fn require_declared(&self, event_type: &K) -> Result<(), BusError> {
        if self.sets.contains_key(event_type) {
            Ok(())
        } else {
            Err(BusError::UndeclaredEventType(format!("{event_type:?}")))
        }
    }

    /// Invokes every handler of `event_type` with `payload`.
    ///
    /// The handler set is copied and the borrow on `core` released before
    /// the first handler runs, so handlers may subscribe, unsubscribe, or
    /// revoke scopes on the same registry. Such changes apply from the
    /// next emit on. A panicking handler unwinds out of this call and the
    /// remaining handlers of the pass are skipped.
    ///
    /// Returns the number of handlers invoked; `0` for undeclared types.
    pub fn dispatch<Q>(core: &RefCell<Self>, event_type: &Q, payload: &P) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + Debug + ?Sized,
    {
        let Some(handlers) = core.borrow().snapshot(event_type) else {
            return 0;
        };

        tracing::trace!(?event_type, handlers = handlers.len(), "emit");
        for handler in &handlers {
            handler.call(payload);
        }
        handlers.len()
    }

    /// Copies the handlers of `event_type` for an emit pass. `None` if the
    /// type is not declared.
    #[must_use]
    pub fn snapshot<Q>(&self, event_type: &Q) -> Option<Vec<Handler<P>>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.sets.get(event_type).map(HandlerSet::snapshot)
    }

    /// Number of handlers subscribed to `event_type`.
    #[must_use]
    pub fn handler_count<Q>(&self, event_type: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.sets.get(event_type).map_or(0, HandlerSet::len)
    }

    /// Returns `true` if `handler` is subscribed to `event_type`.
    #[must_use]
    pub fn contains<Q>(&self, event_type: &Q, handler: &Handler<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.sets
            .get(event_type)
            .is_some_and(|set| set.contains(handler))
    }

    /// The declared vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary<K> {
        &self.vocabulary
    }

    /// The configuration this core was built with.
    #[must_use]
    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    /// Returns `true` if `scope` currently has recorded registrations.
    #[must_use]
    pub fn has_scope(&self, scope: &S) -> bool {
        self.scopes.contains(scope)
    }

    /// Number of records under `scope`, stale ones included.
    #[must_use]
    pub fn scope_len(&self, scope: &S) -> usize {
        self.scopes.records(scope)
    }

    /// Number of live scopes.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}
