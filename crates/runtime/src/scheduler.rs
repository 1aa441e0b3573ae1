//! Tick-driven scheduler for timed, interruptible actions.
//!
//! Every running action snapshots the user's position, held item and damage
//! when it starts. Each [`DoAfterScheduler::advance`] first checks the
//! action's interrupt policy against the current [`World`], then accrues the
//! elapsed time. Exactly one outcome is produced per started action.

use std::time::Duration;

use envelope_core::{
    ActionOutcome, ActionToken, EntityId, EnvelopeAction, ScheduleError, TimedActionRequest,
    TimedActionScheduler,
};
use tracing::{debug, trace};

use crate::world::{Point, World};

/// Why a running action was broken off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InterruptReason {
    ActorGone,
    TargetGone,
    Damaged,
    HandLost,
    HandChanged,
    Moved,
    OutOfRange,
}

/// An action that left the scheduler during [`DoAfterScheduler::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finished {
    pub outcome: ActionOutcome,
    pub action: EnvelopeAction,
    pub interrupted: Option<InterruptReason>,
}

#[derive(Debug)]
struct DoAfter {
    token: ActionToken,
    request: TimedActionRequest,
    elapsed: Duration,
    origin: Point,
    damage_at_start: u32,
    held_at_start: Option<EntityId>,
}

impl DoAfter {
    fn interrupted(&self, world: &World) -> Option<InterruptReason> {
        let policy = &self.request.interrupts;

        let Some(body) = world.actor(self.request.user) else {
            return Some(InterruptReason::ActorGone);
        };
        let Some(target) = world.position_of(self.request.target) else {
            return Some(InterruptReason::TargetGone);
        };

        if policy.breaks_on_damage() && body.damage_taken > self.damage_at_start {
            return Some(InterruptReason::Damaged);
        }
        if policy.needs_hand() && !body.has_hands {
            return Some(InterruptReason::HandLost);
        }
        if policy.breaks_on_hand_change() && body.held != self.held_at_start {
            return Some(InterruptReason::HandChanged);
        }
        if body.position.distance(self.origin) > policy.movement_threshold {
            return Some(InterruptReason::Moved);
        }
        if body.position.distance(target) > policy.distance_threshold {
            return Some(InterruptReason::OutOfRange);
        }

        None
    }

    fn finish(&self, interrupted: Option<InterruptReason>) -> Finished {
        let outcome = ActionOutcome {
            target: self.request.target,
            user: self.request.user,
            token: self.token,
            cancelled: interrupted.is_some(),
        };
        Finished {
            outcome,
            action: self.request.action,
            interrupted,
        }
    }
}

/// In-memory scheduler; outcomes are returned in start order.
#[derive(Debug, Default)]
pub struct DoAfterScheduler {
    active: Vec<DoAfter>,
    next_token: u64,
}

impl DoAfterScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs the scheduler with the world so it can serve as the engine's
    /// [`TimedActionScheduler`] for one call.
    pub fn bind<'a>(&'a mut self, world: &'a World) -> BoundScheduler<'a> {
        BoundScheduler {
            scheduler: self,
            world,
        }
    }

    /// Starts an action if the user is able to begin it right now.
    pub fn start(
        &mut self,
        request: &TimedActionRequest,
        world: &World,
    ) -> Result<ActionToken, ScheduleError> {
        let user = request.user;
        let target = request.target;
        let body = world
            .actor(user)
            .ok_or(ScheduleError::UnknownEntity(user))?;
        let target_position = world
            .position_of(target)
            .ok_or(ScheduleError::UnknownEntity(target))?;

        if request.interrupts.needs_hand() && !body.has_hands {
            return Err(ScheduleError::NeedHand(user));
        }

        let distance = body.position.distance(target_position);
        let limit = request.interrupts.distance_threshold;
        if distance > limit {
            return Err(ScheduleError::OutOfRange {
                user,
                target,
                distance,
                limit,
            });
        }

        if self
            .active
            .iter()
            .any(|running| running.request.user == user && running.request.target == target)
        {
            return Err(ScheduleError::Busy { user, target });
        }

        self.next_token += 1;
        let token = ActionToken(self.next_token);
        self.active.push(DoAfter {
            token,
            request: *request,
            elapsed: Duration::ZERO,
            origin: body.position,
            damage_at_start: body.damage_taken,
            held_at_start: body.held,
        });

        debug!(%token, %user, %target, action = %request.action, delay = ?request.delay, "timed action started");
        Ok(token)
    }

    /// Moves every running action forward by `dt`.
    pub fn advance(&mut self, dt: Duration, world: &World) -> Vec<Finished> {
        let mut finished = Vec::new();

        self.active.retain_mut(|running| {
            if let Some(reason) = running.interrupted(world) {
                debug!(token = %running.token, ?reason, "timed action interrupted");
                finished.push(running.finish(Some(reason)));
                return false;
            }

            running.elapsed += dt;
            if running.elapsed >= running.request.delay {
                trace!(token = %running.token, elapsed = ?running.elapsed, "timed action completed");
                finished.push(running.finish(None));
                return false;
            }

            true
        });

        finished
    }

    /// Drops every action aimed at `target` without reporting outcomes.
    ///
    /// Used when the target entity is removed from the simulation.
    pub fn forget_target(&mut self, target: EntityId) -> usize {
        let before = self.active.len();
        self.active.retain(|running| running.request.target != target);
        before - self.active.len()
    }

    pub fn is_running(&self, token: ActionToken) -> bool {
        self.active.iter().any(|running| running.token == token)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// A [`DoAfterScheduler`] borrowed together with the world it inspects.
pub struct BoundScheduler<'a> {
    scheduler: &'a mut DoAfterScheduler,
    world: &'a World,
}

impl TimedActionScheduler for BoundScheduler<'_> {
    fn try_start(&mut self, request: &TimedActionRequest) -> Result<ActionToken, ScheduleError> {
        self.scheduler.start(request, self.world)
    }
}
