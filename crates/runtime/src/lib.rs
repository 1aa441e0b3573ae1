//! Runtime host for envelope state controllers.
//!
//! This crate wires envelopes from `envelope-core` to a tick-driven timed
//! action scheduler, lock components, a small physical world and a
//! replication bus. Consumers embed [`Simulation`] to spawn envelopes, submit
//! host events and advance simulated time.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the simulation loop and its event queue
//! - [`scheduler`] runs interruptible timed actions against the [`world`]
//! - [`lock`] stores lock components and hands out lock capabilities
//! - [`events`] provides topic-based event bus and the replication sink
//! - [`scenario`] loads scripted runs from RON files
pub mod config;
pub mod error;
pub mod events;
pub mod lock;
pub mod runtime;
pub mod scenario;
pub mod scheduler;
pub mod world;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{
    ActionEvent, DirtyMark, EnvelopeEvent, Event, EventBus, Replicator, Topic,
};
pub use lock::{LockHandle, LockState, LockStore};
pub use runtime::{EnvelopeSpawn, HostEvent, Resolved, Simulation};
pub use scenario::{
    ActorPlacement, Command, EnvelopePlacement, EnvelopeReport, Scenario, ScenarioReport,
    ScenarioStep,
};
pub use scheduler::{DoAfterScheduler, Finished, InterruptReason};
pub use world::{ActorBody, Point, World};
