//! Topic-based event bus for runtime events.
//!
//! Envelope state changes are replicated to observers through this bus, and
//! timed-action progress is published next to them on its own topic.

mod bus;
mod replication;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use replication::{DirtyMark, Replicator};
pub use types::{ActionEvent, EnvelopeEvent};
