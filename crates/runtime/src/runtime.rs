//! Single-threaded host loop driving envelopes, the scheduler and the world.
//!
//! Hosts push [`HostEvent`]s with [`Simulation::submit`] and advance time with
//! [`Simulation::tick`]. Each tick first advances running timed actions and
//! resolves whatever they produced, then drains the event queue in FIFO
//! order. Envelope-level refusals are logged and dropped; they never fail the
//! tick.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use envelope_content::EnvelopePrototype;
use envelope_core::{
    ActionOffer, ActionOutcome, EntityId, Envelope, EnvelopeAction, EnvelopeConfig,
    EnvelopeEngine, EnvelopeError, EnvelopeState, ExamineText, HostEnv, LockCapability,
    Resolution, Viewer, examine, offer,
};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{ActionEvent, Event, EventBus, Replicator, Topic};
use crate::lock::LockStore;
use crate::scheduler::DoAfterScheduler;
use crate::world::{ActorBody, Point, World};

/// Input delivered to the simulation between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// `user` picked the offered verb on `envelope`.
    Activate { envelope: EntityId, user: EntityId },
    /// Start a specific action, bypassing the offer menu.
    Request {
        envelope: EntityId,
        user: EntityId,
        action: EnvelopeAction,
    },
    /// Outcome reported by a scheduler other than the built-in one.
    Outcome(ActionOutcome),
}

/// How to create an envelope entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeSpawn {
    pub id: EntityId,
    pub config: EnvelopeConfig,
    pub position: Point,
    pub state: EnvelopeState,
    pub lockable: bool,
}

impl EnvelopeSpawn {
    pub fn new(id: EntityId, config: EnvelopeConfig) -> Self {
        Self {
            id,
            config,
            position: Point::ORIGIN,
            state: EnvelopeState::Open,
            lockable: true,
        }
    }

    pub fn from_prototype(id: EntityId, prototype: &EnvelopePrototype) -> Self {
        Self {
            state: prototype.initial_state,
            lockable: prototype.lockable,
            ..Self::new(id, prototype.config())
        }
    }

    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: EnvelopeState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn without_lock(mut self) -> Self {
        self.lockable = false;
        self
    }
}

/// An outcome the simulation handed to an envelope, and what came of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Resolved {
    pub envelope: EntityId,
    pub user: EntityId,
    pub resolution: Resolution,
}

pub struct Simulation {
    config: RuntimeConfig,
    clock: Duration,
    world: World,
    envelopes: BTreeMap<EntityId, Envelope>,
    scheduler: DoAfterScheduler,
    locks: LockStore,
    replicator: Replicator,
    queue: VecDeque<HostEvent>,
}

impl Simulation {
    pub fn new(config: RuntimeConfig) -> Self {
        let bus = EventBus::with_capacity(config.bus_capacity);
        Self {
            config,
            clock: Duration::ZERO,
            world: World::new(),
            envelopes: BTreeMap::new(),
            scheduler: DoAfterScheduler::new(),
            locks: LockStore::new(),
            replicator: Replicator::new(bus),
            queue: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Simulated time elapsed since creation.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for host-side mutations (movement, damage, hands).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn locks(&self) -> &LockStore {
        &self.locks
    }

    pub fn scheduler(&self) -> &DoAfterScheduler {
        &self.scheduler
    }

    pub fn replication(&self) -> &Replicator {
        &self.replicator
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.replicator.bus().subscribe(topic)
    }

    pub fn envelope(&self, id: EntityId) -> Option<&Envelope> {
        self.envelopes.get(&id)
    }

    pub fn envelopes(&self) -> impl Iterator<Item = &Envelope> {
        self.envelopes.values()
    }

    pub fn add_actor(&mut self, id: EntityId, body: ActorBody) -> Result<()> {
        self.world.add_actor(id, body)
    }

    /// Creates an envelope entity, its world presence and its lock component.
    ///
    /// A lockable envelope that spawns sealed starts locked.
    pub fn spawn(&mut self, spawn: EnvelopeSpawn) -> Result<()> {
        if self.envelopes.contains_key(&spawn.id) {
            return Err(RuntimeError::DuplicateEntity(spawn.id));
        }
        self.world.place_object(spawn.id, spawn.position)?;

        if spawn.lockable {
            self.locks
                .insert(spawn.id, spawn.state == EnvelopeState::Sealed);
        }

        let envelope = Envelope::new(spawn.id, spawn.config).with_state(spawn.state);
        self.envelopes.insert(spawn.id, envelope);

        info!(envelope = %spawn.id, state = %spawn.state, lockable = spawn.lockable, "envelope spawned");
        Ok(())
    }

    /// Removes an envelope entity. Its running action is dropped silently.
    pub fn despawn(&mut self, id: EntityId) -> Result<Envelope> {
        let envelope = self
            .envelopes
            .remove(&id)
            .ok_or(RuntimeError::UnknownEnvelope(id))?;

        self.world.remove_object(id);
        self.locks.remove(id);
        let dropped = self.scheduler.forget_target(id);

        info!(envelope = %id, dropped, "envelope despawned");
        Ok(envelope)
    }

    /// Capabilities of `user` with respect to `envelope`, derived from the world.
    pub fn viewer_for(&self, user: EntityId, envelope: EntityId) -> Result<Viewer> {
        let body = self
            .world
            .actor(user)
            .ok_or(RuntimeError::UnknownActor(user))?;
        let position = self
            .world
            .position_of(envelope)
            .ok_or(RuntimeError::UnknownEnvelope(envelope))?;

        Ok(Viewer {
            user,
            can_access: body.position.distance(position) <= self.config.interaction_range,
            can_interact: body.can_interact,
            has_hands: body.has_hands,
        })
    }

    /// The verb `viewer` would see on `envelope`.
    pub fn offer(&self, envelope: EntityId, viewer: &Viewer) -> Result<Option<ActionOffer>> {
        let envelope = self.get(envelope)?;
        Ok(offer(envelope, viewer))
    }

    pub fn examine(&self, envelope: EntityId) -> Result<Option<ExamineText>> {
        let envelope = self.get(envelope)?;
        Ok(examine(envelope))
    }

    /// Queues an event for the next tick.
    pub fn submit(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::Activate { envelope, user } | HostEvent::Request { envelope, user, .. } => {
                self.get(envelope)?;
                if self.world.actor(user).is_none() {
                    return Err(RuntimeError::UnknownActor(user));
                }
            }
            HostEvent::Outcome(outcome) => {
                self.get(outcome.target)?;
            }
        }

        self.queue.push_back(event);
        Ok(())
    }

    /// Advances by the configured tick length, never less than
    /// [`RuntimeConfig::MIN_TICK`].
    pub fn step(&mut self) -> Vec<Resolved> {
        self.tick(self.config.tick.max(RuntimeConfig::MIN_TICK))
    }

    /// Steps until at least `duration` of simulated time has passed.
    pub fn run_for(&mut self, duration: Duration) -> Vec<Resolved> {
        let until = self.clock + duration;
        let mut resolved = Vec::new();
        while self.clock < until {
            resolved.extend(self.step());
        }
        resolved
    }

    /// Advances simulated time by `dt` and processes everything that is due.
    pub fn tick(&mut self, dt: Duration) -> Vec<Resolved> {
        self.clock += dt;
        let mut resolved = Vec::new();

        for finished in self.scheduler.advance(dt, &self.world) {
            let outcome = finished.outcome;
            self.replicator
                .bus()
                .publish(Event::Action(ActionEvent::Finished {
                    envelope: outcome.target,
                    user: outcome.user,
                    token: outcome.token,
                    action: finished.action,
                    cancelled: outcome.cancelled,
                    interrupted: finished.interrupted,
                }));
            resolved.extend(self.resolve(&outcome));
        }

        while let Some(event) = self.queue.pop_front() {
            match event {
                HostEvent::Activate { envelope, user } => self.activate(envelope, user),
                HostEvent::Request {
                    envelope,
                    user,
                    action,
                } => self.start(envelope, user, action),
                HostEvent::Outcome(outcome) => resolved.extend(self.resolve(&outcome)),
            }
        }

        resolved
    }

    fn get(&self, envelope: EntityId) -> Result<&Envelope> {
        self.envelopes
            .get(&envelope)
            .ok_or(RuntimeError::UnknownEnvelope(envelope))
    }

    fn activate(&mut self, envelope: EntityId, user: EntityId) {
        let offered = self
            .viewer_for(user, envelope)
            .and_then(|viewer| self.offer(envelope, &viewer));

        match offered {
            Ok(Some(offer)) => self.start(envelope, offer.user, offer.action),
            Ok(None) => debug!(%envelope, %user, "nothing to offer"),
            Err(error) => warn!(%envelope, %user, %error, "activation dropped"),
        }
    }

    fn start(&mut self, id: EntityId, user: EntityId, action: EnvelopeAction) {
        let Self {
            world,
            envelopes,
            scheduler,
            replicator,
            ..
        } = self;

        let Some(envelope) = envelopes.get_mut(&id) else {
            warn!(envelope = %id, "start for a removed envelope");
            return;
        };

        let mut bound = scheduler.bind(world);
        let mut env = HostEnv::new(&mut bound, &mut *replicator);
        let started = EnvelopeEngine::new(envelope).start(&mut env, user, action);

        match started {
            Ok(token) => {
                info!(envelope = %id, %user, %action, %token, "timed action requested");
                replicator
                    .bus()
                    .publish(Event::Action(ActionEvent::Started {
                        envelope: id,
                        user,
                        token,
                        action,
                    }));
            }
            Err(error) => debug!(
                envelope = %id,
                %user,
                %action,
                code = error.error_code(),
                severity = error.severity().as_str(),
                %error,
                "timed action not started"
            ),
        }
    }

    fn resolve(&mut self, outcome: &ActionOutcome) -> Option<Resolved> {
        let Self {
            world,
            envelopes,
            scheduler,
            locks,
            replicator,
            ..
        } = self;

        let id = outcome.target;
        let Some(envelope) = envelopes.get_mut(&id) else {
            warn!(envelope = %id, token = %outcome.token, "outcome for a removed envelope");
            return None;
        };

        let mut bound = scheduler.bind(world);
        let mut lock = locks.handle(id);
        let mut env = HostEnv::new(&mut bound, &mut *replicator)
            .with_lock(lock.as_mut().map(|handle| handle as &mut dyn LockCapability));
        let resolution = EnvelopeEngine::new(envelope).resolve(&mut env, outcome);

        match resolution {
            Resolution::Applied { action, from, to } => {
                info!(envelope = %id, user = %outcome.user, %action, %from, %to, "envelope changed")
            }
            Resolution::Cancelled => {
                debug!(envelope = %id, user = %outcome.user, token = %outcome.token, "timed action cancelled")
            }
            Resolution::Ignored(reason) => {
                warn!(envelope = %id, token = %outcome.token, ?reason, "outcome ignored")
            }
        }

        Some(Resolved {
            envelope: id,
            user: outcome.user,
            resolution,
        })
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}
