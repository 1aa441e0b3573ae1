use std::time::Duration;

use envelope_core::{
    ActionOutcome, ActionToken, EntityId, Envelope, EnvelopeAction, EnvelopeConfig,
    EnvelopeEngine, EnvelopeState, HostEnv, LockCapability, ReplicationSink, Resolution,
    ScheduleError, StartError, TimedActionRequest, TimedActionScheduler, Viewer, offer,
};

const ENVELOPE: EntityId = EntityId(100);
const ALICE: EntityId = EntityId(1);
const BOB: EntityId = EntityId(2);

/// Scheduler fake that records every request and hands out sequential tokens.
#[derive(Default)]
struct RecordingScheduler {
    requests: Vec<TimedActionRequest>,
    next: u64,
    refuse: Option<ScheduleError>,
}

impl TimedActionScheduler for RecordingScheduler {
    fn try_start(&mut self, request: &TimedActionRequest) -> Result<ActionToken, ScheduleError> {
        if let Some(error) = self.refuse.clone() {
            return Err(error);
        }
        self.requests.push(*request);
        self.next += 1;
        Ok(ActionToken(self.next))
    }
}

#[derive(Default)]
struct FakeLock {
    locked: bool,
    last_actor: Option<EntityId>,
}

impl LockCapability for FakeLock {
    fn lock(&mut self, _target: EntityId, actor: EntityId) {
        self.locked = true;
        self.last_actor = Some(actor);
    }

    fn unlock(&mut self, _target: EntityId, actor: EntityId) {
        self.locked = false;
        self.last_actor = Some(actor);
    }
}

#[derive(Default)]
struct DirtyLog(Vec<(EntityId, EnvelopeState)>);

impl ReplicationSink for DirtyLog {
    fn mark_dirty(&mut self, entity: EntityId, state: EnvelopeState) {
        self.0.push((entity, state));
    }
}

/// Host fixture owning one envelope and every collaborator.
struct Host {
    envelope: Envelope,
    scheduler: RecordingScheduler,
    lock: FakeLock,
    dirty: DirtyLog,
    lockable: bool,
}

impl Host {
    fn new() -> Self {
        let config = EnvelopeConfig::with_delays(Duration::from_secs(3), Duration::from_secs(2));
        Self {
            envelope: Envelope::new(ENVELOPE, config),
            scheduler: RecordingScheduler::default(),
            lock: FakeLock::default(),
            dirty: DirtyLog::default(),
            lockable: true,
        }
    }

    fn without_lock(mut self) -> Self {
        self.lockable = false;
        self
    }

    fn start(&mut self, user: EntityId, action: EnvelopeAction) -> Result<ActionToken, StartError> {
        let lock = self
            .lockable
            .then_some(&mut self.lock as &mut dyn LockCapability);
        let mut env = HostEnv::new(&mut self.scheduler, &mut self.dirty).with_lock(lock);
        EnvelopeEngine::new(&mut self.envelope).start(&mut env, user, action)
    }

    fn activate(&mut self, user: EntityId) -> Option<Result<ActionToken, StartError>> {
        let offer = offer(&self.envelope, &Viewer::capable(user))?;
        let lock = self
            .lockable
            .then_some(&mut self.lock as &mut dyn LockCapability);
        let mut env = HostEnv::new(&mut self.scheduler, &mut self.dirty).with_lock(lock);
        Some(EnvelopeEngine::new(&mut self.envelope).activate(&mut env, &offer))
    }

    fn finish(&mut self, user: EntityId, token: ActionToken, cancelled: bool) -> Resolution {
        let outcome = ActionOutcome {
            target: ENVELOPE,
            user,
            token,
            cancelled,
        };
        let lock = self
            .lockable
            .then_some(&mut self.lock as &mut dyn LockCapability);
        let mut env = HostEnv::new(&mut self.scheduler, &mut self.dirty).with_lock(lock);
        EnvelopeEngine::new(&mut self.envelope).resolve(&mut env, &outcome)
    }
}

#[test]
fn seal_then_unseal_round_trips_with_lock() {
    let mut host = Host::new();

    let token = host.activate(ALICE).unwrap().unwrap();
    assert_eq!(host.envelope.pending_token(), Some(token));
    assert_eq!(host.envelope.state(), EnvelopeState::Open);
    assert_eq!(host.scheduler.requests[0].delay, Duration::from_secs(3));

    host.finish(ALICE, token, false);
    assert_eq!(host.envelope.state(), EnvelopeState::Sealed);
    assert!(host.lock.locked);
    assert_eq!(host.lock.last_actor, Some(ALICE));
    assert_eq!(host.dirty.0, vec![(ENVELOPE, EnvelopeState::Sealed)]);

    let token = host.start(BOB, EnvelopeAction::Unseal).unwrap();
    host.finish(BOB, token, false);
    assert_eq!(host.envelope.state(), EnvelopeState::Open);
    assert!(!host.lock.locked);
    assert_eq!(host.lock.last_actor, Some(BOB));
    assert!(!host.envelope.is_busy());
}

#[test]
fn second_request_while_pending_never_reaches_scheduler() {
    let mut host = Host::new();
    let first = host.activate(ALICE).unwrap().unwrap();

    let second = host.activate(BOB).unwrap();
    assert!(matches!(second, Err(StartError::AlreadyPending { .. })));
    assert_eq!(host.scheduler.requests.len(), 1);
    assert_eq!(host.envelope.pending_token(), Some(first));
    assert_eq!(host.envelope.state(), EnvelopeState::Open);
}

#[test]
fn cancelled_seal_leaves_envelope_open() {
    let mut host = Host::new();
    let token = host.activate(ALICE).unwrap().unwrap();

    let resolution = host.finish(ALICE, token, true);

    assert_eq!(resolution, Resolution::Cancelled);
    assert_eq!(host.envelope.state(), EnvelopeState::Open);
    assert!(!host.envelope.is_busy());
    assert!(!host.lock.locked);
    assert!(host.dirty.0.is_empty());

    // The slot is free again.
    assert!(host.activate(ALICE).unwrap().is_ok());
}

#[test]
fn tear_is_terminal() {
    let mut host = Host::new();
    let token = host.activate(ALICE).unwrap().unwrap();
    host.finish(ALICE, token, false);

    let token = host.activate(ALICE).unwrap().unwrap();
    assert_eq!(host.scheduler.requests[1].action, EnvelopeAction::Tear);
    assert_eq!(host.scheduler.requests[1].delay, Duration::from_secs(2));
    host.finish(ALICE, token, false);

    assert_eq!(host.envelope.state(), EnvelopeState::Torn);
    assert!(!host.lock.locked);
    assert!(host.activate(ALICE).is_none());
    assert!(host.activate(BOB).is_none());
    assert!(host.start(ALICE, EnvelopeAction::Unseal).is_err());

    // Late outcome for a token that never existed.
    host.finish(ALICE, ActionToken(42), false);
    assert_eq!(host.envelope.state(), EnvelopeState::Torn);
    assert_eq!(host.dirty.0.len(), 2);
}

#[test]
fn scheduler_refusal_stores_nothing() {
    let mut host = Host::new();
    host.scheduler.refuse = Some(ScheduleError::NeedHand(ALICE));

    let result = host.activate(ALICE).unwrap();

    assert!(matches!(
        result,
        Err(StartError::Rejected {
            source: ScheduleError::NeedHand(_),
            ..
        })
    ));
    assert!(!host.envelope.is_busy());
    assert_eq!(host.envelope.state(), EnvelopeState::Open);
}

#[test]
fn envelope_without_lock_still_transitions() {
    let mut host = Host::new().without_lock();
    let token = host.activate(ALICE).unwrap().unwrap();

    host.finish(ALICE, token, false);

    assert_eq!(host.envelope.state(), EnvelopeState::Sealed);
    assert!(!host.lock.locked);
    assert_eq!(host.lock.last_actor, None);
    assert_eq!(host.dirty.0.len(), 1);
}

#[test]
fn only_the_first_racing_action_affects_state() {
    let mut host = Host::new();
    let token = host.activate(ALICE).unwrap().unwrap();
    host.finish(ALICE, token, false);

    let alice = host.activate(ALICE).unwrap().unwrap();
    assert!(host.start(BOB, EnvelopeAction::Unseal).is_err());

    host.finish(ALICE, alice, false);
    assert_eq!(host.envelope.state(), EnvelopeState::Torn);
}
