use core::time::Duration;

use crate::action::EnvelopeAction;
use crate::config::InterruptPolicy;
use crate::state::{ActionToken, EntityId};

/// Everything a scheduler needs to run one timed action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedActionRequest {
    /// The envelope being worked on.
    pub target: EntityId,
    pub user: EntityId,
    pub action: EnvelopeAction,
    pub delay: Duration,
    pub interrupts: InterruptPolicy,
}

/// Final report for a timed action, delivered once per started action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub target: EntityId,
    pub user: EntityId,
    pub token: ActionToken,
    pub cancelled: bool,
}

impl ActionOutcome {
    pub fn completed(target: EntityId, user: EntityId, token: ActionToken) -> Self {
        Self {
            target,
            user,
            token,
            cancelled: false,
        }
    }

    pub fn cancelled(target: EntityId, user: EntityId, token: ActionToken) -> Self {
        Self {
            target,
            user,
            token,
            cancelled: true,
        }
    }
}
