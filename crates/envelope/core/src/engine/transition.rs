//! Pure transition logic: `(envelope, event) -> (envelope', effects)`.
//!
//! Nothing here talks to a collaborator. The engine feeds the returned
//! request to the scheduler and the returned effects to the host.

use arrayvec::ArrayVec;

use crate::action::{ActionOutcome, EnvelopeAction, LockChange, TimedActionRequest};
use crate::state::{ActionToken, EntityId, Envelope, EnvelopeState};

use super::errors::StartError;

/// Side effect requested by a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Lock { target: EntityId, actor: EntityId },
    Unlock { target: EntityId, actor: EntityId },
    MarkDirty { entity: EntityId, state: EnvelopeState },
}

/// At most one lock change plus one dirty mark per transition.
pub type Effects = ArrayVec<Effect, 2>;

/// Why an outcome left the state untouched even though it was not cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IgnoreReason {
    /// No action was outstanding, so the intent is unknown.
    NothingPending,
    /// The outcome belongs to some other action.
    StaleToken {
        expected: ActionToken,
        received: ActionToken,
    },
    /// The envelope is already torn.
    Terminal,
    /// The state moved away from what the action was started for.
    StateMismatch {
        action: EnvelopeAction,
        state: EnvelopeState,
    },
}

/// What handling an outcome did to the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    Cancelled,
    Applied {
        action: EnvelopeAction,
        from: EnvelopeState,
        to: EnvelopeState,
    },
    Ignored(IgnoreReason),
}

impl Resolution {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A resolution together with the effects the host must carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub resolution: Resolution,
    pub effects: Effects,
}

impl Transition {
    fn unchanged(resolution: Resolution) -> Self {
        Self {
            resolution,
            effects: Effects::new(),
        }
    }

    fn ignored(reason: IgnoreReason) -> Self {
        Self::unchanged(Resolution::Ignored(reason))
    }
}

/// Validates a start request and builds what the scheduler should run.
///
/// Refuses while another action is outstanding, and when the envelope is not
/// in the state `action` starts from (which also covers torn envelopes).
pub fn prepare_start(
    envelope: &Envelope,
    user: EntityId,
    action: EnvelopeAction,
) -> Result<TimedActionRequest, StartError> {
    if let Some(token) = envelope.pending_token() {
        return Err(StartError::already_pending(envelope.id(), token));
    }

    if envelope.state() != action.source() {
        return Err(StartError::invalid_state(
            envelope.id(),
            action,
            envelope.state(),
        ));
    }

    let config = envelope.config();
    Ok(TimedActionRequest {
        target: envelope.id(),
        user,
        action,
        delay: action.delay(config),
        interrupts: config.interrupts,
    })
}

/// Applies the outcome of a timed action.
///
/// An outcome carrying a token other than the pending one belongs to some
/// other action and leaves the slot alone. Otherwise the pending slot is
/// cleared before anything else. A successful outcome applies the transition
/// recorded when the action started, provided the envelope is still in that
/// transition's source state.
pub fn resolve_outcome(envelope: &mut Envelope, outcome: &ActionOutcome) -> Transition {
    if let Some(expected) = envelope.pending_token()
        && expected != outcome.token
    {
        return Transition::ignored(IgnoreReason::StaleToken {
            expected,
            received: outcome.token,
        });
    }

    let pending = envelope.take_pending();

    if outcome.cancelled {
        return Transition::unchanged(Resolution::Cancelled);
    }

    let Some(pending) = pending else {
        return Transition::ignored(IgnoreReason::NothingPending);
    };

    let from = envelope.state();
    if from.is_terminal() {
        return Transition::ignored(IgnoreReason::Terminal);
    }

    let action = pending.action;
    if from != action.source() {
        return Transition::ignored(IgnoreReason::StateMismatch {
            action,
            state: from,
        });
    }

    let to = action.target();
    envelope.set_state(to);

    let target = envelope.id();
    let actor = outcome.user;
    let mut effects = Effects::new();
    effects.push(match action.lock_change() {
        LockChange::Engage => Effect::Lock { target, actor },
        LockChange::Release => Effect::Unlock { target, actor },
    });
    effects.push(Effect::MarkDirty {
        entity: target,
        state: to,
    });

    Transition {
        resolution: Resolution::Applied { action, from, to },
        effects,
    }
}
