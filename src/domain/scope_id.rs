//! Ready-made scope token.
//!
//! Any `Eq + Hash + Clone` value can group registrations. [`ScopeId`] is
//! the default for owners that have no natural key of their own: mint one
//! when the owner is created, pass it to every scoped subscription, and
//! revoke it when the owner goes away.

use std::fmt;

/// Opaque, collision-free token grouping registrations for bulk
/// revocation.
///
/// Tokens are only ever compared; they carry no data. A revoked token
/// may be reused for new registrations.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(uuid::Uuid);

impl ScopeId {
    /// Mints a token distinct from every other token in the process.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Short form for log lines: `scope-` and the first 8 hex digits.
impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{:08x}", self.0.as_fields().0)
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0.simple())
    }
}
