//! Common error infrastructure for envelope-core.
//!
//! Nothing in the envelope state machine is fatal. Every refusal is a local,
//! recoverable outcome the host may log and otherwise ignore. The types here
//! let hosts classify those refusals uniformly. Operation-specific errors
//! (e.g. [`StartError`](crate::engine::StartError)) live next to the
//! operation that produces them.

/// Severity level of an error, used for categorization and log levels.
///
/// - **Recoverable**: a collaborator refused for now, a later retry may succeed
/// - **Validation**: the request does not make sense in the current state
/// - **Internal**: a collaborator broke its contract (e.g. a stale outcome)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry once circumstances change.
    ///
    /// Examples: user out of reach, no free hand
    Recoverable,

    /// Validation error - invalid request, should not retry unchanged.
    ///
    /// Examples: action already in flight, tearing an open envelope
    Validation,

    /// Internal error - unexpected collaborator behaviour.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug in a collaborator.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all envelope-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait EnvelopeError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
