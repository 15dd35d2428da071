//! Host configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable selecting the [`DuplicatePolicy`].
pub const DUPLICATE_POLICY_ENV: &str = "TYPED_IPC_DUPLICATE_HANDLERS";

/// What the host does when a channel name is registered a second time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Last registration wins, silently.
    Replace,
    /// Last registration wins, with a warning log.
    #[default]
    Warn,
    /// Keep the first registration and fail the new one.
    Reject,
}

/// Unrecognised duplicate policy name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown duplicate policy `{0}` (expected replace, warn or reject)")]
pub struct ParsePolicyError(String);

impl FromStr for DuplicatePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Replace => "replace",
            Self::Warn => "warn",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Configuration for an [`InMemoryHost`](crate::InMemoryHost).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Re-registration behaviour.
    pub duplicate_policy: DuplicatePolicy,
}

impl HostConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TYPED_IPC_DUPLICATE_HANDLERS`: `replace`, `warn` or `reject`
    ///   (default: warn). Unrecognised values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let duplicate_policy = match lookup(DUPLICATE_POLICY_ENV) {
            Some(raw) => raw.parse().unwrap_or_else(|e: ParsePolicyError| {
                tracing::warn!(error = %e, "Ignoring {}", DUPLICATE_POLICY_ENV);
                DuplicatePolicy::default()
            }),
            None => DuplicatePolicy::default(),
        };

        Self { duplicate_policy }
    }

    /// Use `policy` for re-registrations.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
