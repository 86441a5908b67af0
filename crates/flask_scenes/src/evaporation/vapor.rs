//! Vapor particles and their capped pool

use flask_animation::{TimerId, Timestamp};
use slotmap::{new_key_type, SlotMap};
use std::collections::VecDeque;

new_key_type! {
    /// Handle for a vapor particle
    pub struct VaporId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaporKind {
    /// Seeded when the view mounts; never expires
    Ambient,
    /// Produced by a departed liquid particle
    Condensed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaporPhase {
    Visible,
    Fading,
}

#[derive(Clone, Debug)]
pub struct Vapor {
    pub id: VaporId,
    /// `x` from the left, `y` down from the top of the vapor area
    pub position: [f32; 2],
    pub opacity: f32,
    pub kind: VaporKind,
    pub phase: VaporPhase,
    pub spawned_at: Timestamp,
    pub fade_started: Option<Timestamp>,
    /// Pending fade or removal timer
    pub(crate) timer: Option<TimerId>,
}

/// Live vapor particles, oldest first.
///
/// Inserting into a full pool evicts the oldest vapor and hands it back so
/// the caller can cancel its timer and remove its visual.
#[derive(Debug)]
pub struct VaporPool {
    vapors: SlotMap<VaporId, Vapor>,
    order: VecDeque<VaporId>,
    capacity: usize,
    evictions: u64,
}

impl VaporPool {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "vapor pool needs room for at least one vapor");
        Self {
            vapors: SlotMap::with_capacity_and_key(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            evictions: 0,
        }
    }

    pub fn insert(
        &mut self,
        position: [f32; 2],
        opacity: f32,
        kind: VaporKind,
        now: Timestamp,
    ) -> (VaporId, Option<Vapor>) {
        let evicted = if self.vapors.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };
        let id = self.vapors.insert_with_key(|id| Vapor {
            id,
            position,
            opacity,
            kind,
            phase: VaporPhase::Visible,
            spawned_at: now,
            fade_started: None,
            timer: None,
        });
        self.order.push_back(id);
        (id, evicted)
    }

    fn evict_oldest(&mut self) -> Option<Vapor> {
        let id = self.order.pop_front()?;
        self.evictions += 1;
        self.vapors.remove(id)
    }

    pub fn remove(&mut self, id: VaporId) -> Option<Vapor> {
        let vapor = self.vapors.remove(id)?;
        self.order.retain(|v| *v != id);
        Some(vapor)
    }

    pub fn get(&self, id: VaporId) -> Option<&Vapor> {
        self.vapors.get(id)
    }

    pub fn get_mut(&mut self, id: VaporId) -> Option<&mut Vapor> {
        self.vapors.get_mut(id)
    }

    pub fn contains(&self, id: VaporId) -> bool {
        self.vapors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.vapors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vapors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Vapors recycled to make room since the pool was created
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Vapor> + '_ {
        self.order.iter().filter_map(|id| self.vapors.get(*id))
    }

    /// Remove every vapor, oldest first
    pub fn drain(&mut self) -> Vec<Vapor> {
        let drained: Vec<Vapor> = self
            .order
            .drain(..)
            .filter_map(|id| self.vapors.remove(id))
            .collect();
        self.vapors.clear();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(pool: &mut VaporPool, x: f32) -> (VaporId, Option<Vapor>) {
        pool.insert([x, 0.0], 1.0, VaporKind::Condensed, Timestamp::zero())
    }

    #[test]
    fn test_full_pool_evicts_oldest() {
        let mut pool = VaporPool::new(3);
        let (first, _) = insert(&mut pool, 1.0);
        insert(&mut pool, 2.0);
        insert(&mut pool, 3.0);

        let (fourth, evicted) = insert(&mut pool, 4.0);
        assert_eq!(evicted.map(|v| v.id), Some(first));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.evictions(), 1);
        assert!(!pool.contains(first));
        assert!(pool.contains(fourth));

        let xs: Vec<f32> = pool.iter().map(|v| v.position[0]).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut pool = VaporPool::new(4);
        let (a, _) = insert(&mut pool, 1.0);
        let (b, _) = insert(&mut pool, 2.0);
        insert(&mut pool, 3.0);

        assert!(pool.remove(b).is_some());
        assert!(pool.remove(b).is_none());
        insert(&mut pool, 4.0);
        insert(&mut pool, 5.0);
        let (_, evicted) = insert(&mut pool, 6.0);
        assert_eq!(evicted.map(|v| v.id), Some(a));
    }

    #[test]
    fn test_drain_empties_pool() {
        let mut pool = VaporPool::new(2);
        insert(&mut pool, 1.0);
        insert(&mut pool, 2.0);
        let drained = pool.drain();
        assert_eq!(drained.len(), 2);
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
    }
}
