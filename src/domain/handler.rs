//! Identity-compared event handlers.
//!
//! [`Handler`] wraps a reference-counted closure. Two handlers are equal
//! only if they are clones of the same allocation, never because they
//! wrap "the same" code. Keep a clone of the handler you subscribed to
//! be able to unsubscribe it later.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Callable subscribed to one or more event types.
///
/// Cloning is cheap and preserves identity: a clone is the same handler
/// as far as every registry in this crate is concerned.
pub struct Handler<P: ?Sized> {
    callback: Rc<dyn Fn(&P)>,
}

impl<P: ?Sized> Handler<P> {
    /// Wraps a closure into a new handler with a fresh identity.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&P) + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invokes the handler with `payload`.
    pub fn call(&self, payload: &P) {
        (self.callback)(payload);
    }

    /// Returns `true` if both handlers share the same identity.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// Address of the shared allocation, without trait-object metadata.
    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.callback).cast::<()>()
    }
}

impl<P: ?Sized> Clone for Handler<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<P: ?Sized> PartialEq for Handler<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<P: ?Sized> Eq for Handler<P> {}

impl<P: ?Sized> Hash for Handler<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<P: ?Sized> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", self.addr())
    }
}
