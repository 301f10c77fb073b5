//! Registry configuration loaded from environment variables.
//!
//! All settings have defaults matching the permissive behavior of the
//! registries, so configuration is optional. Values can come from the
//! process environment or a `.env` file via `dotenvy`.
//!
//! | Variable                   | Values                         | Default  |
//! |----------------------------|--------------------------------|----------|
//! | `BUSSIN_UNDECLARED_POLICY` | `ignore`, `warn`               | `ignore` |
//! | `BUSSIN_SCRUB_SCOPES`      | `true`, `false`, `1`, `0`      | `false`  |

use std::str::FromStr;

use crate::error::BusError;

/// Environment key for [`RegistryConfig::undeclared_policy`].
pub const UNDECLARED_POLICY_VAR: &str = "BUSSIN_UNDECLARED_POLICY";

/// Environment key for [`RegistryConfig::scrub_scopes_on_unsubscribe`].
pub const SCRUB_SCOPES_VAR: &str = "BUSSIN_SCRUB_SCOPES";

/// What a scoped registry does when asked to subscribe to an event type
/// outside its declared vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndeclaredPolicy {
    /// Drop the call silently.
    #[default]
    Ignore,
    /// Drop the call and emit a `tracing` warning naming the type.
    Warn,
}

impl FromStr for UndeclaredPolicy {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            other => Err(BusError::InvalidConfig(format!(
                "{UNDECLARED_POLICY_VAR}={other}"
            ))),
        }
    }
}

/// Behavior switches shared by [`crate::bus::ScopedRegistry`] and
/// [`crate::bus::SharedScopedRegistry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Handling of subscriptions to undeclared event types.
    pub undeclared_policy: UndeclaredPolicy,

    /// When `true`, `unsubscribe` also removes the pair from every scope
    /// that recorded it. When `false`, scopes keep stale records until
    /// they are revoked.
    pub scrub_scopes_on_unsubscribe: bool,
}

impl RegistryConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file
    /// first. Unset variables fall back to [`RegistryConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidConfig`] if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, BusError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidConfig`] if a present value cannot be
    /// parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BusError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let undeclared_policy = match lookup(UNDECLARED_POLICY_VAR) {
            Some(raw) => raw.parse()?,
            None => UndeclaredPolicy::default(),
        };

        let scrub_scopes_on_unsubscribe = match lookup(SCRUB_SCOPES_VAR) {
            Some(raw) => parse_bool(SCRUB_SCOPES_VAR, &raw)?,
            None => false,
        };

        Ok(Self {
            undeclared_policy,
            scrub_scopes_on_unsubscribe,
        })
    }
}

/// Parses a boolean flag. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive).
fn parse_bool(key: &str, raw: &str) -> Result<bool, BusError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(BusError::InvalidConfig(format!("{key}={other}"))),
    }
}
