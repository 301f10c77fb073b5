//! Open-vocabulary event bus.
//!
//! [`EventBus`] accepts any event type. A handler set is created the
//! first time a type is subscribed to and is kept afterwards, even once
//! empty. There is no scope support.

use std::borrow::Borrow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::domain::{Handler, HandlerSet};

/// Synchronous multi-type event bus without a declared vocabulary.
///
/// All methods take `&self` so handlers holding a reference to the bus
/// can subscribe and unsubscribe from inside an emit pass. See
/// [`EventBus::emit`] for how such changes interact with that pass.
pub struct EventBus<K = String, P: ?Sized = ()> {
    handlers: RefCell<HashMap<K, HandlerSet<P>>>,
}

impl<K, P> EventBus<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: ?Sized,
{
    /// Creates a bus with no handler sets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
        }
    }

    /// Adds `handler` to `event_type`, creating the type's set if needed.
    ///
    /// Returns `false` if the handler was already subscribed, in which
    /// case nothing changes.
    pub fn subscribe(&self, event_type: impl Into<K>, handler: &Handler<P>) -> bool {
        let event_type = event_type.into();
        let mut handlers = self.handlers.borrow_mut();
        let added = handlers.entry(event_type.clone()).or_default().insert(handler);
        tracing::trace!(?event_type, added, "subscribe");
        added
    }

    /// Removes `handler` from `event_type`. Unknown types and handlers
    /// are ignored. Returns `true` if something was removed.
    pub fn unsubscribe<Q>(&self, event_type: &Q, handler: &Handler<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        let removed = self
            .handlers
            .borrow_mut()
            .get_mut(event_type)
            .is_some_and(|set| set.remove(handler));
        tracing::trace!(?event_type, removed, "unsubscribe");
        removed
    }

    /// Invokes every handler subscribed to `event_type` with `payload`,
    /// each exactly once, on the caller's thread.
    ///
    /// The handler set is snapshotted before the first call: handlers
    /// subscribed during the pass run from the next emit on, handlers
    /// unsubscribed during the pass still run in this one. A panicking
    /// handler propagates out of `emit` and the rest of the pass is
    /// skipped; the bus stays usable.
    ///
    /// Returns the number of handlers invoked.
    pub fn emit<Q>(&self, event_type: &Q, payload: &P) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        let Some(snapshot) = self.handlers.borrow().get(event_type).map(HandlerSet::snapshot)
        else {
            return 0;
        };

        tracing::trace!(?event_type, handlers = snapshot.len(), "emit");
        for handler in &snapshot {
            handler.call(payload);
        }
        snapshot.len()
    }

    /// Number of handlers subscribed to `event_type`.
    #[must_use]
    pub fn handler_count<Q>(&self, event_type: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.handlers
            .borrow()
            .get(event_type)
            .map_or(0, HandlerSet::len)
    }

    /// Returns `true` if `handler` is subscribed to `event_type`.
    #[must_use]
    pub fn contains<Q>(&self, event_type: &Q, handler: &Handler<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.handlers
            .borrow()
            .get(event_type)
            .is_some_and(|set| set.contains(handler))
    }

    /// Event types that have a handler set, including emptied ones.
    #[must_use]
    pub fn event_types(&self) -> Vec<K> {
        self.handlers.borrow().keys().cloned().collect()
    }

    /// Drops every handler set.
    ///
    /// Handlers are dropped after the bus is released, so their captured
    /// state may use the bus from its `Drop`.
    pub fn clear(&self) {
        let handlers = std::mem::take(&mut *self.handlers.borrow_mut());
        drop(handlers);
    }
}

impl<K, P> Default for EventBus<K, P>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> fmt::Debug for EventBus<K, P>
where
    K: fmt::Debug,
    P: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.borrow();
        let mut map = f.debug_map();
        for (event_type, set) in handlers.iter() {
            map.entry(event_type, &set.len());
        }
        map.finish()
    }
}
