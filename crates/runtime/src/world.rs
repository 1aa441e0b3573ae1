//! Minimal physical world the scheduler inspects for interrupts.
//!
//! Tracks where actors and objects are, what each actor holds, and how much
//! damage each actor has taken. Nothing here knows about envelopes.

use std::collections::HashMap;

use envelope_core::EntityId;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

/// Continuous position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Physical state of an actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorBody {
    pub position: Point,
    pub has_hands: bool,
    /// False while stunned, restrained or otherwise unable to act.
    pub can_interact: bool,
    /// Item in the active hand.
    pub held: Option<EntityId>,
    /// Total damage taken so far; only ever grows.
    pub damage_taken: u32,
}

impl ActorBody {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            has_hands: true,
            can_interact: true,
            held: None,
            damage_taken: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct World {
    actors: HashMap<EntityId, ActorBody>,
    objects: HashMap<EntityId, Point>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor(&mut self, id: EntityId, body: ActorBody) -> Result<()> {
        if self.contains(id) {
            return Err(RuntimeError::DuplicateEntity(id));
        }
        self.actors.insert(id, body);
        Ok(())
    }

    pub fn place_object(&mut self, id: EntityId, position: Point) -> Result<()> {
        if self.contains(id) {
            return Err(RuntimeError::DuplicateEntity(id));
        }
        self.objects.insert(id, position);
        Ok(())
    }

    pub fn remove_object(&mut self, id: EntityId) {
        self.objects.remove(&id);
        for body in self.actors.values_mut() {
            if body.held == Some(id) {
                body.held = None;
            }
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.actors.contains_key(&id) || self.objects.contains_key(&id)
    }

    pub fn actor(&self, id: EntityId) -> Option<&ActorBody> {
        self.actors.get(&id)
    }

    /// Where `id` currently is. Held objects travel with their holder.
    pub fn position_of(&self, id: EntityId) -> Option<Point> {
        if let Some(body) = self.actors.get(&id) {
            return Some(body.position);
        }
        self.actors
            .values()
            .find(|body| body.held == Some(id))
            .map(|body| body.position)
            .or_else(|| self.objects.get(&id).copied())
    }

    pub fn move_actor(&mut self, id: EntityId, to: Point) -> Result<()> {
        self.actor_mut(id)?.position = to;
        Ok(())
    }

    pub fn damage(&mut self, id: EntityId, amount: u32) -> Result<()> {
        let body = self.actor_mut(id)?;
        body.damage_taken = body.damage_taken.saturating_add(amount);
        Ok(())
    }

    pub fn set_held(&mut self, id: EntityId, item: Option<EntityId>) -> Result<()> {
        self.actor_mut(id)?.held = item;
        Ok(())
    }

    pub fn set_hands(&mut self, id: EntityId, has_hands: bool) -> Result<()> {
        let body = self.actor_mut(id)?;
        body.has_hands = has_hands;
        if !has_hands {
            body.held = None;
        }
        Ok(())
    }

    pub fn set_can_interact(&mut self, id: EntityId, can_interact: bool) -> Result<()> {
        self.actor_mut(id)?.can_interact = can_interact;
        Ok(())
    }

    fn actor_mut(&mut self, id: EntityId) -> Result<&mut ActorBody> {
        self.actors
            .get_mut(&id)
            .ok_or(RuntimeError::UnknownActor(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_objects_follow_their_holder() {
        let mut world = World::new();
        world
            .add_actor(EntityId(1), ActorBody::new(Point::new(2.0, 0.0)))
            .unwrap();
        world.place_object(EntityId(9), Point::ORIGIN).unwrap();

        assert_eq!(world.position_of(EntityId(9)), Some(Point::ORIGIN));

        world.set_held(EntityId(1), Some(EntityId(9))).unwrap();
        assert_eq!(world.position_of(EntityId(9)), Some(Point::new(2.0, 0.0)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut world = World::new();
        world.place_object(EntityId(9), Point::ORIGIN).unwrap();

        assert!(matches!(
            world.add_actor(EntityId(9), ActorBody::new(Point::ORIGIN)),
            Err(RuntimeError::DuplicateEntity(_))
        ));
    }
}
