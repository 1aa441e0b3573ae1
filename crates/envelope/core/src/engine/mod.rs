//! Timed-action pipeline for a single envelope.
//!
//! The [`EnvelopeEngine`] is the only writer of an [`Envelope`]. It pairs the
//! pure functions in [`transition`] with the host collaborators in
//! [`HostEnv`]: start requests go to the scheduler, and outcome effects go
//! to the lock and replication handles.

mod errors;
mod transition;

pub use errors::StartError;
pub use transition::{
    Effect, Effects, IgnoreReason, Resolution, Transition, prepare_start, resolve_outcome,
};

use crate::action::{ActionOffer, ActionOutcome, EnvelopeAction};
use crate::env::HostEnv;
use crate::state::{ActionToken, EntityId, Envelope, PendingAction};

/// Drives one envelope through start and outcome events.
pub struct EnvelopeEngine<'a> {
    envelope: &'a mut Envelope,
}

impl<'a> EnvelopeEngine<'a> {
    pub fn new(envelope: &'a mut Envelope) -> Self {
        Self { envelope }
    }

    /// Starts the action a viewer picked from the offer menu.
    pub fn activate(
        &mut self,
        env: &mut HostEnv<'_>,
        offer: &ActionOffer,
    ) -> Result<ActionToken, StartError> {
        debug_assert_eq!(offer.envelope, self.envelope.id());
        self.start(env, offer.user, offer.action)
    }

    /// Asks the scheduler to run `action` for `user`.
    ///
    /// Nothing about the envelope's state changes here. On success the token
    /// and intent are recorded so the outcome can be matched later; on any
    /// error the envelope is left exactly as it was.
    pub fn start(
        &mut self,
        env: &mut HostEnv<'_>,
        user: EntityId,
        action: EnvelopeAction,
    ) -> Result<ActionToken, StartError> {
        let request = prepare_start(self.envelope, user, action)?;

        let token = env
            .scheduler()
            .try_start(&request)
            .map_err(|source| StartError::Rejected {
                envelope: self.envelope.id(),
                action,
                source,
            })?;

        self.envelope.begin(PendingAction {
            token,
            action,
            user,
        });
        Ok(token)
    }

    /// Applies a scheduler outcome and carries out the resulting effects.
    pub fn resolve(&mut self, env: &mut HostEnv<'_>, outcome: &ActionOutcome) -> Resolution {
        let transition = resolve_outcome(self.envelope, outcome);

        for effect in &transition.effects {
            env.dispatch(effect);
        }

        transition.resolution
    }
}
