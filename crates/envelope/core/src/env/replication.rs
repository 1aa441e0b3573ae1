use crate::state::{EntityId, EnvelopeState};

/// Receives the dirty signal that accompanies every state change.
pub trait ReplicationSink {
    fn mark_dirty(&mut self, entity: EntityId, state: EnvelopeState);
}
