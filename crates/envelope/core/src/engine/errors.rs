//! Error types for starting timed actions.

use crate::action::EnvelopeAction;
use crate::env::ScheduleError;
use crate::error::{EnvelopeError, ErrorSeverity};
use crate::state::{ActionToken, EntityId, EnvelopeState};

/// Why a timed action was not started.
///
/// None of these reach the user; the request simply has no effect.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StartError {
    #[error("envelope {envelope} is already waiting on {token}")]
    AlreadyPending {
        envelope: EntityId,
        token: ActionToken,
    },

    #[error("cannot {action} envelope {envelope} while it is {state}")]
    InvalidState {
        envelope: EntityId,
        action: EnvelopeAction,
        state: EnvelopeState,
    },

    #[error("scheduler refused to {action} envelope {envelope}: {source}")]
    Rejected {
        envelope: EntityId,
        action: EnvelopeAction,
        #[source]
        source: ScheduleError,
    },
}

impl StartError {
    pub(super) fn already_pending(envelope: EntityId, token: ActionToken) -> Self {
        Self::AlreadyPending { envelope, token }
    }

    pub(super) fn invalid_state(
        envelope: EntityId,
        action: EnvelopeAction,
        state: EnvelopeState,
    ) -> Self {
        Self::InvalidState {
            envelope,
            action,
            state,
        }
    }
}

impl EnvelopeError for StartError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyPending { .. } | Self::InvalidState { .. } => ErrorSeverity::Validation,
            Self::Rejected { source, .. } => source.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyPending { .. } => "START_ALREADY_PENDING",
            Self::InvalidState { .. } => "START_INVALID_STATE",
            Self::Rejected { .. } => "START_REJECTED",
        }
    }
}
