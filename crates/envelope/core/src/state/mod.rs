//! Envelope component data and identifiers.
mod common;
mod envelope;

pub use common::{ActionToken, EntityId};
pub use envelope::{Envelope, EnvelopeState, PendingAction};
