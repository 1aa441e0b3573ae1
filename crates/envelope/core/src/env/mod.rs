//! Traits describing the host collaborators the engine calls into.
//!
//! The scheduler, the lock component and the replication channel are owned
//! by the host. [`HostEnv`] bundles borrowed handles to them so the engine
//! can reach everything it needs for one call without owning any of it.
mod lock;
mod replication;
mod scheduler;

pub use lock::LockCapability;
pub use replication::ReplicationSink;
pub use scheduler::{ScheduleError, TimedActionScheduler};

use crate::engine::Effect;

/// Collaborators available to the engine for a single call.
///
/// The lock is optional: targets without a lock component simply skip the
/// lock side effects.
pub struct HostEnv<'a> {
    scheduler: &'a mut dyn TimedActionScheduler,
    replication: &'a mut dyn ReplicationSink,
    lock: Option<&'a mut dyn LockCapability>,
}

impl<'a> HostEnv<'a> {
    pub fn new(
        scheduler: &'a mut dyn TimedActionScheduler,
        replication: &'a mut dyn ReplicationSink,
    ) -> Self {
        Self {
            scheduler,
            replication,
            lock: None,
        }
    }

    /// Attaches the target's lock capability, if it has one.
    #[must_use]
    pub fn with_lock(mut self, lock: Option<&'a mut dyn LockCapability>) -> Self {
        self.lock = lock;
        self
    }

    pub fn scheduler(&mut self) -> &mut dyn TimedActionScheduler {
        &mut *self.scheduler
    }

    pub fn has_lock(&self) -> bool {
        self.lock.is_some()
    }

    /// Routes one effect to the collaborator responsible for it.
    ///
    /// Lock effects are dropped when the target has no lock capability.
    pub fn dispatch(&mut self, effect: &Effect) {
        match *effect {
            Effect::Lock { target, actor } => {
                if let Some(lock) = self.lock.as_deref_mut() {
                    lock.lock(target, actor);
                }
            }
            Effect::Unlock { target, actor } => {
                if let Some(lock) = self.lock.as_deref_mut() {
                    lock.unlock(target, actor);
                }
            }
            Effect::MarkDirty { entity, state } => self.replication.mark_dirty(entity, state),
        }
    }
}
