//! Timed collectibles
//!
//! Hearts and power-ups sit on the ground for a fixed time, then vanish.
//! Entities are kept sorted by id so expiry order is deterministic.

use glam::Vec2;

use super::state::{EntityId, EntityKind, TimedEntity};
use crate::error::{CoreError, Result};

/// An entity removed because its time ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Registry of live timed entities for one session
#[derive(Debug, Clone)]
pub struct TimedEntityRegistry {
    entities: Vec<TimedEntity>,
    /// Next entity ID
    next_id: EntityId,
}

impl Default for TimedEntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TimedEntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Track a new entity at the origin
    pub fn spawn(&mut self, kind: EntityKind, initial_life: f32) -> EntityId {
        self.spawn_at(kind, initial_life, Vec2::ZERO)
    }

    /// Track a new entity at `pos`
    pub fn spawn_at(&mut self, kind: EntityKind, initial_life: f32, pos: Vec2) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        // Ids only grow, so pushing keeps the list sorted.
        self.entities.push(TimedEntity {
            id,
            kind,
            remaining_life: initial_life,
            pos,
        });
        id
    }

    /// Age every entity by `dt`, removing and returning those that ran out
    pub fn tick(&mut self, dt: f32) -> Vec<Expired> {
        let mut expired = Vec::new();
        self.entities.retain_mut(|e| {
            e.remaining_life -= dt;
            if e.remaining_life <= 0.0 {
                expired.push(Expired {
                    id: e.id,
                    kind: e.kind,
                });
                false
            } else {
                true
            }
        });
        expired
    }

    /// Remove an entity right away and return its kind
    pub fn collect(&mut self, id: EntityId) -> Result<EntityKind> {
        let idx = self
            .entities
            .binary_search_by_key(&id, |e| e.id)
            .map_err(|_| CoreError::NotFound(id))?;
        Ok(self.entities.remove(idx).kind)
    }

    pub fn get(&self, id: EntityId) -> Option<&TimedEntity> {
        self.entities
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entities[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEntity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop everything. Ids keep counting so stale handles never match.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
