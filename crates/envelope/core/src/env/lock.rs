use crate::state::EntityId;

/// Lock component of a target entity.
///
/// Not every envelope has one. The host hands the engine
/// `Some(&mut dyn LockCapability)` only for lockable targets.
pub trait LockCapability {
    fn lock(&mut self, target: EntityId, actor: EntityId);

    fn unlock(&mut self, target: EntityId, actor: EntityId);
}
