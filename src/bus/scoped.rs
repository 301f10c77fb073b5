//! Per-instance registry over a declared vocabulary, with scopes.
//!
//! [`ScopedRegistry`] only accepts the event types it was declared with.
//! Subscriptions can be grouped under a scope token and revoked together
//! with [`ScopedRegistry::revoke_scope`], which is the usual way for a
//! component to detach everything it registered when it goes away.
//!
//! Two registries declared with the same event types are unrelated; use
//! [`crate::bus::SharedScopedRegistry`] when handles must share state.

use std::borrow::Borrow;
use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;

use crate::config::RegistryConfig;
use crate::domain::{Handler, RegistryCore, ScopeId, Vocabulary};
use crate::error::BusError;

/// Event registry owning its handler sets and scope index.
pub struct ScopedRegistry<K = String, P: ?Sized = (), S = ScopeId> {
    core: RefCell<RegistryCore<K, P, S>>,
}

impl<K, P, S> ScopedRegistry<K, P, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: ?Sized,
    S: Eq + Hash + fmt::Debug,
{
    /// Creates a registry over `vocabulary` with the default config.
    #[must_use]
    pub fn new(vocabulary: Vocabulary<K>) -> Self {
        Self::with_config(vocabulary, RegistryConfig::default())
    }

    /// Creates a registry over `vocabulary` with an explicit config.
    #[must_use]
    pub fn with_config(vocabulary: Vocabulary<K>, config: RegistryConfig) -> Self {
        Self {
            core: RefCell::new(RegistryCore::new(vocabulary, config)),
        }
    }

    /// Declares the vocabulary and creates the registry in one step.
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

    /// Adds `handler` to `event_type`.
    ///
    /// Undeclared types are ignored and reported by returning `false`.
    pub fn subscribe(&self, event_type: impl Into<K>, handler: &Handler<P>) -> bool {
        self.core
            .borrow_mut()
            .subscribe(event_type.into(), handler, None)
    }

    /// Adds `handler` to `event_type` and records the pair under `scope`.
    ///
    /// The pair is recorded even if the handler was already subscribed,
    /// so revoking `scope` later removes it regardless of who else
    /// subscribed it. Undeclared types are ignored and reported by
    /// returning `false`.
    pub fn subscribe_in(&self, event_type: impl Into<K>, handler: &Handler<P>, scope: S) -> bool {
        self.core
            .borrow_mut()
            .subscribe(event_type.into(), handler, Some(scope))
    }

    /// Like [`ScopedRegistry::subscribe`], but rejects undeclared types.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UndeclaredEventType`] if `event_type` is not
    /// part of the vocabulary.
    pub fn try_subscribe(
        &self,
        event_type: impl Into<K>,
        handler: &Handler<P>,
    ) -> Result<(), BusError> {
        let event_type = event_type.into();
        let mut core = self.core.borrow_mut();
        core.require_declared(&event_type)?;
        core.subscribe(event_type, handler, None);
        Ok(())
    }

    /// Like [`ScopedRegistry::subscribe_in`], but rejects undeclared types.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UndeclaredEventType`] if `event_type` is not
    /// part of the vocabulary.
    pub fn try_subscribe_in(
        &self,
        event_type: impl Into<K>,
        handler: &Handler<P>,
        scope: S,
    ) -> Result<(), BusError> {
        let event_type = event_type.into();
        let mut core = self.core.borrow_mut();
        core.require_declared(&event_type)?;
        core.subscribe(event_type, handler, Some(scope));
        Ok(())
    }

    /// Removes `handler` from `event_type`. Returns `true` if it was
    /// subscribed.
    ///
    /// Scopes that recorded the pair keep their record unless the
    /// registry was configured to scrub them.
    pub fn unsubscribe<Q>(&self, event_type: &Q, handler: &Handler<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        self.core.borrow_mut().unsubscribe(event_type, handler)
    }

    /// Invokes every handler of `event_type` with `payload`.
    ///
    /// Undeclared types are a no-op. Snapshot and panic semantics are
    /// those of [`RegistryCore::dispatch`]. Returns the number of
    /// handlers invoked.
    pub fn emit<Q>(&self, event_type: &Q, payload: &P) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + fmt::Debug + ?Sized,
    {
        RegistryCore::dispatch(&self.core, event_type, payload)
    }

    /// Unsubscribes every pair recorded under `scope` and forgets the
    /// scope, which may then be reused. Unknown scopes are ignored.
    ///
    /// Returns the number of handlers actually removed.
    pub fn revoke_scope(&self, scope: &S) -> usize {
        let (removed, records) = self.core.borrow_mut().revoke_scope(scope);
        // Last handler clones may live here; drop them unborrowed.
        drop(records);
        removed
    }

    /// Number of handlers subscribed to `event_type`.
    #[must_use]
    pub fn handler_count<Q>(&self, event_type: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.core.borrow().handler_count(event_type)
    }

    /// Returns `true` if `handler` is subscribed to `event_type`.
    #[must_use]
    pub fn contains<Q>(&self, event_type: &Q, handler: &Handler<P>) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.core.borrow().contains(event_type, handler)
    }

    /// Returns `true` if `event_type` is part of the vocabulary.
    #[must_use]
    pub fn is_declared<Q>(&self, event_type: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.core.borrow().vocabulary().contains(event_type)
    }

    /// A copy of the declared vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> Vocabulary<K> {
        self.core.borrow().vocabulary().clone()
    }

    /// Returns `true` if `scope` has recorded registrations.
    #[must_use]
    pub fn has_scope(&self, scope: &S) -> bool {
        self.core.borrow().has_scope(scope)
    }

    /// Number of pairs recorded under `scope`, stale ones included.
    #[must_use]
    pub fn scope_len(&self, scope: &S) -> usize {
        self.core.borrow().scope_len(scope)
    }

    /// Number of scopes with recorded registrations.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.core.borrow().scope_count()
    }
}

impl<K, P, S> fmt::Debug for ScopedRegistry<K, P, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    P: ?Sized,
    S: Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("ScopedRegistry")
            .field("vocabulary", core.vocabulary())
            .field("scopes", &core.scope_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::cell::Cell;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use super::*;
    use crate::config::UndeclaredPolicy;

    type Registry = ScopedRegistry<String, u32, ScopeId>;

    fn registry() -> Registry {
        let Ok(registry) = Registry::declare(["open", "close", "tick"]) else {
            panic!("valid vocabulary");
        };
        registry
    }

    fn counter() -> (Rc<Cell<u32>>, Handler<u32>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let handler = Handler::new(move |_: &u32| sink.set(sink.get() + 1));
        (count, handler)
    }

    #[test]
    fn declare_rejects_empty_vocabulary() {
        let result = Registry::declare(Vec::<String>::new());
        assert!(matches!(result, Err(BusError::EmptyVocabulary)));
    }

    #[test]
    fn double_subscribe_invokes_once() {
        let reg = registry();
        let (count, h) = counter();
        reg.subscribe("open", &h);
        reg.subscribe("open", &h);
        assert_eq!(reg.emit("open", &0), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn undeclared_type_never_triggers() {
        let reg = registry();
        let (count, h) = counter();
        assert!(!reg.subscribe("foo", &h));
        assert!(!reg.subscribe_in("foo", &h, ScopeId::new()));
        assert_eq!(reg.emit("foo", &1), 0);
        assert_eq!(count.get(), 0);
        assert!(!reg.is_declared("foo"));
        assert_eq!(reg.scope_count(), 0);
    }

    #[test]
    fn undeclared_type_is_ignored_under_warn_policy() {
        let Ok(vocab) = Vocabulary::new(["open"]) else {
            panic!("valid vocabulary");
        };
        let config = RegistryConfig {
            undeclared_policy: UndeclaredPolicy::Warn,
            ..RegistryConfig::default()
        };
        let reg: Registry = ScopedRegistry::with_config(vocab, config);
        let (count, h) = counter();
        assert!(!reg.subscribe("foo", &h));
        reg.emit("foo", &0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn try_subscribe_reports_undeclared() {
        let reg = registry();
        let (_, h) = counter();
        let scope = ScopeId::new();

        assert!(reg.try_subscribe("open", &h).is_ok());
        assert_eq!(
            reg.try_subscribe("foo", &h),
            Err(BusError::UndeclaredEventType("\"foo\"".to_string()))
        );
        assert!(reg.try_subscribe_in("close", &h, scope).is_ok());
        assert!(reg.try_subscribe_in("bar", &h, scope).is_err());
        assert_eq!(reg.scope_len(&scope), 1);
    }

    #[test]
    fn unsubscribe_unknown_is_noop() {
        let reg = registry();
        let (_, kept) = counter();
        let (_, stranger) = counter();
        reg.subscribe("open", &kept);
        assert!(!reg.unsubscribe("open", &stranger));
        assert!(!reg.unsubscribe("foo", &kept));
        assert_eq!(reg.handler_count("open"), 1);
    }

    #[test]
    fn revoke_scope_isolates_scopes() {
        let reg = registry();
        let (a_count, a) = counter();
        let (b_count, b) = counter();
        let (scope_a, scope_b) = (ScopeId::new(), ScopeId::new());

        reg.subscribe_in("tick", &a, scope_a);
        reg.subscribe_in("open", &a, scope_a);
        reg.subscribe_in("tick", &b, scope_b);

        assert_eq!(reg.revoke_scope(&scope_a), 2);
        assert_eq!(reg.emit("tick", &0), 1);
        reg.emit("open", &0);
        assert_eq!(a_count.get(), 0);
        assert_eq!(b_count.get(), 1);
        assert!(!reg.has_scope(&scope_a));
        assert!(reg.has_scope(&scope_b));
    }

    #[test]
    fn revoked_scope_can_be_reused() {
        let reg = registry();
        let (old_count, old) = counter();
        let (new_count, new) = counter();
        let (kept_count, kept) = counter();
        let scope = ScopeId::new();

        reg.subscribe_in("tick", &old, scope);
        reg.revoke_scope(&scope);

        reg.subscribe("tick", &old);
        reg.subscribe("tick", &kept);
        reg.subscribe_in("tick", &new, scope);
        assert_eq!(reg.scope_len(&scope), 1);
        assert_eq!(reg.revoke_scope(&scope), 1);

        reg.emit("tick", &0);
        assert_eq!(old_count.get(), 1);
        assert_eq!(kept_count.get(), 1);
        assert_eq!(new_count.get(), 0);
    }

    #[test]
    fn revoke_unknown_scope_is_noop() {
        let reg = registry();
        let (_, h) = counter();
        reg.subscribe("open", &h);
        assert_eq!(reg.revoke_scope(&ScopeId::new()), 0);
        assert_eq!(reg.handler_count("open"), 1);
    }

    #[test]
    fn revoke_removes_pair_subscribed_elsewhere_too() {
        let reg = registry();
        let (count, h) = counter();
        let (scope_a, scope_b) = (ScopeId::new(), ScopeId::new());

        reg.subscribe_in("tick", &h, scope_a);
        reg.subscribe_in("tick", &h, scope_b);
        reg.revoke_scope(&scope_a);

        assert_eq!(reg.emit("tick", &0), 0);
        assert_eq!(count.get(), 0);
        // scope_b still holds a now-stale record.
        assert_eq!(reg.scope_len(&scope_b), 1);
        assert_eq!(reg.revoke_scope(&scope_b), 0);
    }

    #[test]
    fn stale_record_survives_plain_unsubscribe() {
        let reg = registry();
        let (count, h) = counter();
        let scope = ScopeId::new();

        reg.subscribe_in("tick", &h, scope);
        assert!(reg.unsubscribe("tick", &h));
        assert_eq!(reg.scope_len(&scope), 1);

        // Re-subscribed without a scope, the handler is still removed by
        // the stale record.
        reg.subscribe("tick", &h);
        assert_eq!(reg.revoke_scope(&scope), 1);
        reg.emit("tick", &0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn scrub_config_forgets_unsubscribed_pairs() {
        let Ok(vocab) = Vocabulary::new(["tick"]) else {
            panic!("valid vocabulary");
        };
        let config = RegistryConfig {
            scrub_scopes_on_unsubscribe: true,
            ..RegistryConfig::default()
        };
        let reg: Registry = ScopedRegistry::with_config(vocab, config);
        let (count, h) = counter();
        let scope = ScopeId::new();

        reg.subscribe_in("tick", &h, scope);
        reg.unsubscribe("tick", &h);
        assert!(!reg.has_scope(&scope));

        reg.subscribe("tick", &h);
        assert_eq!(reg.revoke_scope(&scope), 0);
        reg.emit("tick", &0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn separate_instances_do_not_share() {
        let a = registry();
        let b = registry();
        let (count, h) = counter();
        a.subscribe("tick", &h);
        assert_eq!(b.emit("tick", &1), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn handler_can_revoke_its_own_scope() {
        let reg = Rc::new(registry());
        let scope = ScopeId::new();
        let (sibling_count, sibling) = counter();
        let inner = Rc::clone(&reg);
        let closer = Handler::new(move |_: &u32| {
            inner.revoke_scope(&scope);
        });

        reg.subscribe_in("close", &closer, scope);
        reg.subscribe_in("close", &sibling, scope);

        assert_eq!(reg.emit("close", &0), 2);
        assert_eq!(sibling_count.get(), 1);
        assert_eq!(reg.handler_count("close"), 0);
        assert_eq!(reg.emit("close", &0), 0);
    }

    #[test]
    fn panic_propagates_and_registry_recovers() {
        let reg = registry();
        let boom = Handler::new(|_: &u32| panic!("handler failure"));
        let (count, after) = counter();
        reg.subscribe("tick", &boom);
        reg.subscribe("tick", &after);

        assert!(catch_unwind(AssertUnwindSafe(|| reg.emit("tick", &0))).is_err());
        assert_eq!(count.get(), 0);

        reg.unsubscribe("tick", &boom);
        assert_eq!(reg.emit("tick", &0), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn custom_scope_tokens() {
        let Ok(reg) = ScopedRegistry::<&'static str, u32, &'static str>::declare(["tick"]) else {
            panic!("valid vocabulary");
        };
        let (count, h) = counter();
        reg.subscribe_in("tick", &h, "widget-1");
        assert_eq!(reg.revoke_scope(&"widget-1"), 1);
        reg.emit("tick", &0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn payload_is_passed_by_reference() {
        let Ok(reg) = ScopedRegistry::<String, Vec<u8>>::declare(["data"]) else {
            panic!("valid vocabulary");
        };
        let payload = vec![1, 2, 3];
        let addr = Rc::new(Cell::new(std::ptr::null::<Vec<u8>>()));
        let sink = Rc::clone(&addr);
        let h = Handler::new(move |p: &Vec<u8>| sink.set(std::ptr::from_ref(p)));

        reg.subscribe_in("data", &h, ScopeId::new());
        reg.emit("data", &payload);
        assert_eq!(addr.get(), std::ptr::from_ref(&payload));
        assert_eq!(payload, vec![1, 2, 3]);
    }

    #[test]
    fn every_handler_runs_exactly_once() {
        let reg = registry();
        let scope = ScopeId::new();
        let counters: Vec<_> = (0..5).map(|_| counter()).collect();
        for (i, (_, h)) in counters.iter().enumerate().rev() {
            if i % 2 == 0 {
                reg.subscribe_in("tick", h, scope);
            } else {
                reg.subscribe("tick", h);
            }
        }
        assert_eq!(reg.emit("tick", &0), 5);
        assert!(counters.iter().all(|(count, _)| count.get() == 1));
    }

    struct Reenter {
        registry: Rc<Registry>,
        dropped: Rc<Cell<bool>>,
    }

    impl Drop for Reenter {
        fn drop(&mut self) {
            self.registry.subscribe("close", &Handler::new(|_: &u32| {}));
            self.dropped.set(true);
        }
    }

    #[test]
    fn revoked_handler_state_may_use_registry_on_drop() {
        let reg = Rc::new(registry());
        let dropped = Rc::new(Cell::new(false));
        let guard = Reenter {
            registry: Rc::clone(&reg),
            dropped: Rc::clone(&dropped),
        };
        let scope = ScopeId::new();

        let holder = Handler::new(move |_: &u32| {
            let _held = &guard;
        });
        reg.subscribe_in("tick", &holder, scope);
        // Only the registry keeps the handler alive from here on.
        drop(holder);
        assert!(!dropped.get());

        assert_eq!(reg.revoke_scope(&scope), 1);
        assert!(dropped.get());
        assert_eq!(reg.handler_count("close"), 1);
    }
}
