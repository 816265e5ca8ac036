//! Bounded collection of live entities.

use crate::entity::{Entity, EntityId, EntitySpec};
use crate::layout::Layout;
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;

/// Which spawn loses when the pool is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    /// The new spawn request is dropped.
    #[default]
    DropNewest,
    /// The oldest live entity is evicted to make room.
    EvictOldest,
}

/// Entities in spawn order. The population never exceeds `capacity`.
#[derive(Clone, Debug)]
pub struct EntityPool {
    entities: VecDeque<Entity>,
    capacity: usize,
    policy: OverflowPolicy,
    next_id: EntityId,
    dropped: u64,
}

impl EntityPool {
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, OverflowPolicy::default())
    }

    pub fn with_policy(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            entities: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            policy,
            next_id: 0,
            dropped: 0,
        }
    }

    /// Add one entity. Returns `None` when the cap swallowed the request.
    pub fn spawn(&mut self, spec: EntitySpec) -> Option<EntityId> {
        if self.capacity == 0 {
            self.dropped += 1;
            return None;
        }
        if self.entities.len() >= self.capacity {
            match self.policy {
                OverflowPolicy::DropNewest => {
                    self.dropped += 1;
                    return None;
                }
                OverflowPolicy::EvictOldest => {
                    self.entities.pop_front();
                    self.dropped += 1;
                }
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push_back(Entity::from_spec(id, spec));
        Some(id)
    }

    /// Advance every live entity by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        for entity in self.entities.iter_mut() {
            entity.step(dt);
        }
    }

    /// Remove every entity matching `predicate`; returns how many were removed.
    pub fn cull<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Entity) -> bool,
    {
        let before = self.entities.len();
        self.entities.retain(|e| !predicate(e));
        before - self.entities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Change the cap; when shrinking, the oldest entities go first.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entities.len() > capacity {
            self.entities.pop_front();
        }
    }

    /// Spawn requests lost to the cap (including evictions) since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Re-read paths and targets from a freshly built layout.
    pub fn rebind(&mut self, layout: &Layout) {
        for entity in self.entities.iter_mut() {
            entity.rebind(
                |c| layout.connection(c).map(|conn| conn.path),
                |a| layout.anchors().get(a).map(|anchor| anchor.position),
            );
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
