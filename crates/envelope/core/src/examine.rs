//! Examine text for envelopes.

use crate::state::{EntityId, Envelope, EnvelopeState};

/// Localized line appended to an examine tooltip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExamineText {
    /// Localization key.
    pub key: &'static str,
    /// Passed to the template as `envelope`.
    pub envelope: EntityId,
}

/// Open envelopes have nothing worth remarking on.
pub fn examine(envelope: &Envelope) -> Option<ExamineText> {
    let key = match envelope.state() {
        EnvelopeState::Open => return None,
        EnvelopeState::Sealed => "envelope-sealed-examine",
        EnvelopeState::Torn => "envelope-torn-examine",
    };

    Some(ExamineText {
        key,
        envelope: envelope.id(),
    })
}
