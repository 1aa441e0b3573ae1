//! Event types for different topics.

use envelope_core::{ActionToken, EntityId, EnvelopeAction, EnvelopeState};
use serde::{Deserialize, Serialize};

use crate::scheduler::InterruptReason;

/// Replicated envelope state, published on every dirty mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvelopeEvent {
    StateChanged {
        entity: EntityId,
        state: EnvelopeState,
    },
}

/// Lifecycle of timed actions, for observers such as progress bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionEvent {
    Started {
        envelope: EntityId,
        user: EntityId,
        token: ActionToken,
        action: EnvelopeAction,
    },

    Finished {
        envelope: EntityId,
        user: EntityId,
        token: ActionToken,
        action: EnvelopeAction,
        cancelled: bool,
        interrupted: Option<InterruptReason>,
    },
}
