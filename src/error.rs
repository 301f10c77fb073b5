//! Error types for registry construction and checked subscription.
//!
//! The core operations (`subscribe`, `unsubscribe`, `emit`,
//! `revoke_scope`) are total and never fail. [`BusError`] only surfaces
//! from building a [`crate::domain::Vocabulary`], loading a
//! [`crate::config::RegistryConfig`], and the `try_` subscription forms
//! that report an undeclared event type instead of ignoring it.

/// Error enum for the few fallible entry points of the crate.
///
/// # Error Codes
///
/// | Code | Variant                 | Raised by                          |
/// |------|-------------------------|------------------------------------|
/// | 1001 | `EmptyVocabulary`       | `Vocabulary::new`                  |
/// | 1002 | `UndeclaredEventType`   | `try_subscribe`, `try_subscribe_in`|
/// | 1003 | `InvalidConfig`         | `RegistryConfig::from_env`         |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// A vocabulary was declared without any event types.
    #[error("vocabulary must declare at least one event type")]
    EmptyVocabulary,

    /// An event type outside the declared vocabulary was used.
    #[error("undeclared event type: {0}")]
    UndeclaredEventType(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BusError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::EmptyVocabulary => 1001,
            Self::UndeclaredEventType(_) => 1002,
            Self::InvalidConfig(_) => 1003,
        }
    }
}
