//! Replication sink that fans dirty marks out over the event bus.

use envelope_core::{EntityId, EnvelopeState, ReplicationSink};

use super::bus::{Event, EventBus};
use super::types::EnvelopeEvent;

/// One dirty mark, as recorded by the [`Replicator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyMark {
    pub entity: EntityId,
    pub state: EnvelopeState,
}

/// Publishes every dirty mark and keeps a history of them.
pub struct Replicator {
    bus: EventBus,
    history: Vec<DirtyMark>,
}

impl Replicator {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            history: Vec::new(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn history(&self) -> &[DirtyMark] {
        &self.history
    }

    /// Number of dirty marks recorded for `entity`.
    pub fn marks_for(&self, entity: EntityId) -> usize {
        self.history
            .iter()
            .filter(|mark| mark.entity == entity)
            .count()
    }
}

impl ReplicationSink for Replicator {
    fn mark_dirty(&mut self, entity: EntityId, state: EnvelopeState) {
        self.history.push(DirtyMark { entity, state });
        self.bus
            .publish(Event::Envelope(EnvelopeEvent::StateChanged { entity, state }));
    }
}
