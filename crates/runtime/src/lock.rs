//! Lock components keyed by entity.

use std::collections::HashMap;

use envelope_core::{EntityId, LockCapability};
use tracing::debug;

/// State of one lock component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockState {
    pub locked: bool,
    /// Who last toggled the lock.
    pub last_actor: Option<EntityId>,
}

/// Every lock component in the simulation. An entity is lockable iff it has
/// an entry here.
#[derive(Debug, Default)]
pub struct LockStore {
    locks: HashMap<EntityId, LockState>,
}

impl LockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a lock component to `entity`.
    pub fn insert(&mut self, entity: EntityId, locked: bool) {
        self.locks.insert(
            entity,
            LockState {
                locked,
                last_actor: None,
            },
        );
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<LockState> {
        self.locks.remove(&entity)
    }

    pub fn get(&self, entity: EntityId) -> Option<&LockState> {
        self.locks.get(&entity)
    }

    pub fn is_locked(&self, entity: EntityId) -> bool {
        self.get(entity).is_some_and(|lock| lock.locked)
    }

    /// Resolves the lock capability of `entity`, if it has one.
    pub fn handle(&mut self, entity: EntityId) -> Option<LockHandle<'_>> {
        self.locks
            .get_mut(&entity)
            .map(|state| LockHandle { entity, state })
    }
}

/// Mutable access to a single entity's lock component.
pub struct LockHandle<'a> {
    entity: EntityId,
    state: &'a mut LockState,
}

impl LockHandle<'_> {
    fn set(&mut self, target: EntityId, actor: EntityId, locked: bool) {
        debug_assert_eq!(target, self.entity, "lock handle used for another entity");
        self.state.locked = locked;
        self.state.last_actor = Some(actor);
        debug!(%target, %actor, locked, "lock toggled");
    }
}

impl LockCapability for LockHandle<'_> {
    fn lock(&mut self, target: EntityId, actor: EntityId) {
        self.set(target, actor, true);
    }

    fn unlock(&mut self, target: EntityId, actor: EntityId) {
        self.set(target, actor, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_entities_with_a_component_resolve() {
        let mut store = LockStore::new();
        store.insert(EntityId(5), false);

        assert!(store.handle(EntityId(5)).is_some());
        assert!(store.handle(EntityId(6)).is_none());
        assert!(!store.is_locked(EntityId(6)));
    }

    #[test]
    fn handle_records_actor() {
        let mut store = LockStore::new();
        store.insert(EntityId(5), false);

        store
            .handle(EntityId(5))
            .unwrap()
            .lock(EntityId(5), EntityId(1));

        assert_eq!(
            store.get(EntityId(5)),
            Some(&LockState {
                locked: true,
                last_actor: Some(EntityId(1))
            })
        );
    }
}
