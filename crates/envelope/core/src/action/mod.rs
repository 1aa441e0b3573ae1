//! Envelope actions: what a user can ask for, and the messages exchanged
//! with the scheduler while the action runs.
mod offer;
mod request;

pub use offer::{ActionOffer, Viewer, offer};
pub use request::{ActionOutcome, TimedActionRequest};

use core::time::Duration;

use crate::config::EnvelopeConfig;
use crate::state::EnvelopeState;

/// The transition a timed action was started for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvelopeAction {
    /// Open → Sealed, engages the lock.
    Seal,
    /// Sealed → Open, releases the lock. Never offered to viewers.
    Unseal,
    /// Sealed → Torn, releases the lock for good.
    Tear,
}

/// What happens to the target's lock when an action completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockChange {
    Engage,
    Release,
}

impl EnvelopeAction {
    /// State the envelope must be in for this action to start or apply.
    pub const fn source(self) -> EnvelopeState {
        match self {
            Self::Seal => EnvelopeState::Open,
            Self::Unseal | Self::Tear => EnvelopeState::Sealed,
        }
    }

    /// State the envelope ends up in when this action completes.
    pub const fn target(self) -> EnvelopeState {
        match self {
            Self::Seal => EnvelopeState::Sealed,
            Self::Unseal => EnvelopeState::Open,
            Self::Tear => EnvelopeState::Torn,
        }
    }

    pub const fn lock_change(self) -> LockChange {
        match self {
            Self::Seal => LockChange::Engage,
            Self::Unseal | Self::Tear => LockChange::Release,
        }
    }

    /// How long the user has to keep at it.
    pub fn delay(self, config: &EnvelopeConfig) -> Duration {
        match self {
            Self::Seal | Self::Unseal => config.seal_delay,
            Self::Tear => config.tear_delay,
        }
    }

    /// Localization key of the verb shown to the user.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seal => "envelope-verb-seal",
            Self::Unseal => "envelope-verb-unseal",
            Self::Tear => "envelope-verb-tear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_action_moves_out_of_its_source() {
        for action in EnvelopeAction::iter() {
            assert_ne!(action.source(), action.target(), "{action}");
            assert!(!action.source().is_terminal());
        }
    }

    #[test]
    fn unseal_reuses_the_seal_delay() {
        let config =
            EnvelopeConfig::with_delays(Duration::from_millis(300), Duration::from_millis(700));

        assert_eq!(EnvelopeAction::Seal.delay(&config), Duration::from_millis(300));
        assert_eq!(EnvelopeAction::Unseal.delay(&config), Duration::from_millis(300));
        assert_eq!(EnvelopeAction::Tear.delay(&config), Duration::from_millis(700));
    }

    #[test]
    fn only_sealing_engages_the_lock() {
        assert_eq!(EnvelopeAction::Seal.lock_change(), LockChange::Engage);
        assert_eq!(EnvelopeAction::Unseal.lock_change(), LockChange::Release);
        assert_eq!(EnvelopeAction::Tear.lock_change(), LockChange::Release);
    }
}
