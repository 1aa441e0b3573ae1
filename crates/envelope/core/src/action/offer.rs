//! Contextual action offered to a viewer looking at an envelope.

use crate::action::EnvelopeAction;
use crate::state::{EntityId, Envelope, EnvelopeState};

/// What the viewer is able to do right now, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewer {
    pub user: EntityId,
    pub can_access: bool,
    pub can_interact: bool,
    pub has_hands: bool,
}

impl Viewer {
    /// A viewer in reach, able to interact, with hands.
    pub fn capable(user: EntityId) -> Self {
        Self {
            user,
            can_access: true,
            can_interact: true,
            has_hands: true,
        }
    }

    pub fn is_capable(&self) -> bool {
        self.can_access && self.can_interact && self.has_hands
    }
}

/// A single menu entry. Activate it through
/// [`EnvelopeEngine::activate`](crate::engine::EnvelopeEngine::activate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActionOffer {
    pub envelope: EntityId,
    pub user: EntityId,
    pub action: EnvelopeAction,
    /// Localization key of the verb text.
    pub label: &'static str,
    /// Entity whose sprite is shown next to the verb.
    pub icon: EntityId,
}

/// Returns the action `viewer` may start on `envelope`, if any.
///
/// Open envelopes offer sealing, sealed ones offer tearing. Torn envelopes
/// and viewers that cannot reach, interact, or hold things get nothing.
pub fn offer(envelope: &Envelope, viewer: &Viewer) -> Option<ActionOffer> {
    if !viewer.is_capable() {
        return None;
    }

    let action = match envelope.state() {
        EnvelopeState::Open => EnvelopeAction::Seal,
        EnvelopeState::Sealed => EnvelopeAction::Tear,
        EnvelopeState::Torn => return None,
    };

    Some(ActionOffer {
        envelope: envelope.id(),
        user: viewer.user,
        action,
        label: action.label(),
        icon: envelope.id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvelopeConfig;

    const USER: EntityId = EntityId(1);

    fn envelope(state: EnvelopeState) -> Envelope {
        Envelope::new(EntityId(10), EnvelopeConfig::default()).with_state(state)
    }

    #[test]
    fn open_envelope_offers_seal() {
        let offer = offer(&envelope(EnvelopeState::Open), &Viewer::capable(USER)).unwrap();

        assert_eq!(offer.action, EnvelopeAction::Seal);
        assert_eq!(offer.label, "envelope-verb-seal");
        assert_eq!(offer.icon, EntityId(10));
        assert_eq!(offer.user, USER);
    }

    #[test]
    fn sealed_envelope_offers_tear() {
        let offer = offer(&envelope(EnvelopeState::Sealed), &Viewer::capable(USER)).unwrap();

        assert_eq!(offer.action, EnvelopeAction::Tear);
        assert_eq!(offer.label, "envelope-verb-tear");
    }

    #[test]
    fn torn_envelope_offers_nothing() {
        assert!(offer(&envelope(EnvelopeState::Torn), &Viewer::capable(USER)).is_none());
    }

    #[test]
    fn incapable_viewers_get_nothing() {
        let capable = Viewer::capable(USER);
        let viewers = [
            Viewer {
                can_access: false,
                ..capable
            },
            Viewer {
                can_interact: false,
                ..capable
            },
            Viewer {
                has_hands: false,
                ..capable
            },
        ];

        for viewer in viewers {
            assert!(offer(&envelope(EnvelopeState::Open), &viewer).is_none());
            assert!(offer(&envelope(EnvelopeState::Sealed), &viewer).is_none());
        }
    }
}
