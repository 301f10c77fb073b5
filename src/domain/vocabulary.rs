//! Fixed set of event types a scoped registry accepts.

use std::borrow::Borrow;
use std::hash::Hash;

use crate::error::BusError;

/// Declared event types, fixed at construction.
///
/// Never empty. Duplicates in the declaration collapse to one entry and
/// declaration order is kept for iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary<K> {
    types: Vec<K>,
}

impl<K: Eq + Hash> Vocabulary<K> {
    /// Declares a vocabulary from a list of event types.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::EmptyVocabulary`] if `types` yields nothing.
    pub fn new<I>(types: I) -> Result<Self, BusError>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        let mut declared: Vec<K> = Vec::new();
        for ty in types {
            let ty = ty.into();
            if !declared.contains(&ty) {
                declared.push(ty);
            }
        }
        if declared.is_empty() {
            return Err(BusError::EmptyVocabulary);
        }
        Ok(Self { types: declared })
    }

    /// Returns `true` if `event_type` is declared.
    #[must_use]
    pub fn contains<Q>(&self, event_type: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.types.iter().any(|ty| ty.borrow() == event_type)
    }

    /// Iterates the declared types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.types.iter()
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
