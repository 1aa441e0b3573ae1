//! Timed state machine for sealable envelopes.
//!
//! `envelope-core` defines the canonical rules for an envelope that can be
//! open, sealed or torn, and exposes pure APIs that any host loop can drive.
//! All state mutation flows through [`engine::EnvelopeEngine`]; the host
//! supplies its scheduler, lock component and replication channel through
//! [`env::HostEnv`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod examine;
pub mod state;

pub use action::{
    ActionOffer, ActionOutcome, EnvelopeAction, LockChange, TimedActionRequest, Viewer, offer,
};
pub use config::{EnvelopeConfig, InterruptFlags, InterruptPolicy};
pub use engine::{Effect, EnvelopeEngine, IgnoreReason, Resolution, StartError, Transition};
pub use env::{HostEnv, LockCapability, ReplicationSink, ScheduleError, TimedActionScheduler};
pub use error::{EnvelopeError, ErrorSeverity};
pub use examine::{ExamineText, examine};
pub use state::{ActionToken, EntityId, Envelope, EnvelopeState, PendingAction};
