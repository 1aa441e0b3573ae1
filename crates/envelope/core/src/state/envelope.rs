use crate::action::EnvelopeAction;
use crate::config::EnvelopeConfig;
use crate::state::{ActionToken, EntityId};

/// Physical condition of an envelope.
///
/// Open and Sealed toggle into each other; Torn is terminal.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvelopeState {
    #[default]
    Open,
    Sealed,
    Torn,
}

impl EnvelopeState {
    /// Returns true if no transition leaves this state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Torn)
    }
}

/// A timed action this envelope is waiting on.
///
/// The intent is recorded at start time so the outcome applies the transition
/// that was requested, not one re-derived from the state at completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAction {
    pub token: ActionToken,
    pub action: EnvelopeAction,
    pub user: EntityId,
}

/// The envelope component: condition plus the single in-flight action slot.
///
/// The host creates and removes envelopes. The engine only ever touches
/// `state` and `pending`, and only through [`crate::engine`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    id: EntityId,
    state: EnvelopeState,
    pending: Option<PendingAction>,
    config: EnvelopeConfig,
}

impl Envelope {
    /// Creates an open envelope with nothing pending.
    pub fn new(id: EntityId, config: EnvelopeConfig) -> Self {
        Self {
            id,
            state: EnvelopeState::Open,
            pending: None,
            config,
        }
    }

    /// Overrides the initial state, for prototypes that spawn sealed or torn.
    #[must_use]
    pub fn with_state(mut self, state: EnvelopeState) -> Self {
        self.state = state;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn pending_token(&self) -> Option<ActionToken> {
        self.pending.map(|pending| pending.token)
    }

    /// Returns true while a timed action is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    pub(crate) fn set_state(&mut self, state: EnvelopeState) {
        self.state = state;
    }

    pub(crate) fn begin(&mut self, pending: PendingAction) {
        debug_assert!(self.pending.is_none(), "envelope already has an action");
        self.pending = Some(pending);
    }

    pub(crate) fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}
