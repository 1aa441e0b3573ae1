use crate::action::TimedActionRequest;
use crate::error::{EnvelopeError, ErrorSeverity};
use crate::state::{ActionToken, EntityId};

/// Runs cancellable, duration-gated actions on behalf of the engine.
///
/// Starting never blocks. The scheduler later reports exactly one
/// [`ActionOutcome`](crate::action::ActionOutcome) per token it handed out,
/// and that outcome is fed back through
/// [`EnvelopeEngine::resolve`](crate::engine::EnvelopeEngine::resolve).
pub trait TimedActionScheduler {
    fn try_start(&mut self, request: &TimedActionRequest) -> Result<ActionToken, ScheduleError>;
}

/// Reasons a scheduler refuses to start an action.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("entity {0} is not known to the scheduler")]
    UnknownEntity(EntityId),

    #[error("user {0} has no hand to work with")]
    NeedHand(EntityId),

    #[error("user {user} is {distance:.2} away from {target}, limit is {limit:.2}")]
    OutOfRange {
        user: EntityId,
        target: EntityId,
        distance: f32,
        limit: f32,
    },

    #[error("user {user} is already working on {target}")]
    Busy { user: EntityId, target: EntityId },
}

impl EnvelopeError for ScheduleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity(_) => ErrorSeverity::Internal,
            Self::NeedHand(_) | Self::OutOfRange { .. } | Self::Busy { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "SCHEDULE_UNKNOWN_ENTITY",
            Self::NeedHand(_) => "SCHEDULE_NEED_HAND",
            Self::OutOfRange { .. } => "SCHEDULE_OUT_OF_RANGE",
            Self::Busy { .. } => "SCHEDULE_BUSY",
        }
    }
}
