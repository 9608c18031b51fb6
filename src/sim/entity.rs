//! Transient on-screen entities (balloons, paint blobs, treasures)
//!
//! The store is the only owner of entities. Removal is two-phase: hits and
//! expiries clear `alive`, and `cleanup` drops dead entries at the end of the
//! tick so every system sees a stable list while the tick runs.

use std::fmt;

use glam::Vec2;

use super::collision::{Rect, circle_bounds, point_in_circle};

/// Stable entity handle, unique within a session
pub type EntityId = u32;

/// Closed set of entity types for one game variant
pub trait EntityKind: Copy + Eq + fmt::Debug + 'static {
    /// Hit radius in pixels
    fn radius(self) -> f32;
    /// Short label for HUD text and logs
    fn label(self) -> &'static str;
    /// Fill color as 0xRRGGBB
    fn color(self) -> u32;
    /// Multiplier on the spawn speed
    fn speed_factor(self) -> f32 {
        1.0
    }
}

/// Direction every entity of a variant travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Spawn below the arena, travel up (balloons)
    Rise,
    /// Spawn above the arena, travel down (paint)
    Fall,
    /// Placed on the ground, the player moves instead (treasure)
    Static,
}

impl Motion {
    /// Unit direction in screen space (y grows downward)
    pub fn direction(self) -> Vec2 {
        match self {
            Motion::Rise => Vec2::NEG_Y,
            Motion::Fall => Vec2::Y,
            Motion::Static => Vec2::ZERO,
        }
    }
}

/// How an entity left the store without being hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Crossed the top edge
    Top,
    /// Crossed the bottom edge
    Bottom,
    /// Lifetime ran out
    Expired,
}

/// A single entity
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<K> {
    pub id: EntityId,
    pub kind: K,
    pub pos: Vec2,
    /// Constant speed in pixels/s along the variant's motion direction
    pub speed: f32,
    /// Seconds left before expiry (static entities only)
    pub ttl: Option<f32>,
    pub alive: bool,
}

impl<K: EntityKind> Entity<K> {
    pub fn radius(&self) -> f32 {
        self.kind.radius()
    }

    pub fn hit_by(&self, point: Vec2) -> bool {
        point_in_circle(point, self.pos, self.radius())
    }

    pub fn bounds(&self) -> Rect {
        circle_bounds(self.pos, self.radius())
    }
}

/// An entity that left through an edge or timed out this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Removed<K> {
    pub id: EntityId,
    pub kind: K,
    pub pos: Vec2,
    pub exit: Exit,
}

/// Owner of all live entities, kept in spawn (id) order
#[derive(Debug, Clone)]
pub struct EntityStore<K> {
    entities: Vec<Entity<K>>,
    next_id: EntityId,
}

impl<K: EntityKind> Default for EntityStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> EntityStore<K> {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity<K>> {
        self.entities.iter()
    }

    /// Live entities only
    pub fn alive(&self) -> impl Iterator<Item = &Entity<K>> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<K>> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Add an entity and return its id
    pub fn spawn(&mut self, kind: K, pos: Vec2, speed: f32, ttl: Option<f32>) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            speed,
            ttl,
            alive: true,
        });
        id
    }

    /// Move every live entity and retire the ones that left the arena or
    /// ran out of time. `speed_scale` applies to this tick only.
    pub fn advance(
        &mut self,
        dt: f32,
        motion: Motion,
        speed_scale: f32,
        arena_height: f32,
    ) -> Vec<Removed<K>> {
        let dir = motion.direction();
        let mut removed = Vec::new();

        for e in self.entities.iter_mut().filter(|e| e.alive) {
            e.pos += dir * e.speed * speed_scale * dt;

            let r = e.kind.radius();
            let exit = if e.pos.y + r < 0.0 {
                Some(Exit::Top)
            } else if e.pos.y - r > arena_height {
                Some(Exit::Bottom)
            } else if let Some(ttl) = e.ttl.as_mut() {
                *ttl -= dt;
                (*ttl <= 0.0).then_some(Exit::Expired)
            } else {
                None
            };

            if let Some(exit) = exit {
                e.alive = false;
                removed.push(Removed {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    exit,
                });
            }
        }

        removed
    }

    /// Every live entity under a tap point
    pub fn hits(&self, point: Vec2) -> Vec<EntityId> {
        self.alive()
            .filter(|e| e.hit_by(point))
            .map(|e| e.id)
            .collect()
    }

    /// Every live entity whose bounding box overlaps `rect`
    pub fn overlapping(&self, rect: &Rect) -> Vec<EntityId> {
        self.alive()
            .filter(|e| e.bounds().intersects(rect))
            .map(|e| e.id)
            .collect()
    }

    /// Live entity whose edge is horizontally closest to `x`, if its edge
    /// lies within `reach`
    pub fn nearest_in_column(&self, x: f32, reach: f32) -> Option<EntityId> {
        self.alive()
            .map(|e| (e.id, ((e.pos.x - x).abs() - e.radius()).max(0.0)))
            .filter(|&(_, gap)| gap <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Mark an entity dead; returns its kind if it was alive
    pub fn kill(&mut self, id: EntityId) -> Option<K> {
        let e = self.entities.iter_mut().find(|e| e.id == id && e.alive)?;
        e.alive = false;
        Some(e.kind)
    }

    /// Drop dead entities
    pub fn cleanup(&mut self) {
        self.entities.retain(|e| e.alive);
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Dot {
        Small,
        Big,
    }

    impl EntityKind for Dot {
        fn radius(self) -> f32 {
            match self {
                Dot::Small => 10.0,
                Dot::Big => 30.0,
            }
        }

        fn label(self) -> &'static str {
            match self {
                Dot::Small => "small",
                Dot::Big => "big",
            }
        }

        fn color(self) -> u32 {
            0xffffff
        }
    }

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut store = EntityStore::new();
        let a = store.spawn(Dot::Small, Vec2::ZERO, 10.0, None);
        let b = store.spawn(Dot::Big, Vec2::ZERO, 10.0, None);
        assert!(b > a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_rise_exits_top() {
        let mut store = EntityStore::new();
        let id = store.spawn(Dot::Small, Vec2::new(50.0, 15.0), 100.0, None);

        // 0.1s at 100px/s -> y = 5, still partly visible
        assert!(store.advance(0.1, Motion::Rise, 1.0, 600.0).is_empty());

        // Another 0.2s -> y = -15, fully above the top edge
        let removed = store.advance(0.2, Motion::Rise, 1.0, 600.0);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, id);
        assert_eq!(removed[0].exit, Exit::Top);

        store.cleanup();
        assert!(store.is_empty());
    }

    #[test]
    fn test_fall_exits_bottom_with_speed_scale() {
        let mut store = EntityStore::new();
        store.spawn(Dot::Small, Vec2::new(50.0, 580.0), 100.0, None);
        // Half speed: moves 10px -> y = 590, bottom edge 600 not crossed by top of circle
        assert!(store.advance(0.2, Motion::Fall, 0.5, 600.0).is_empty());
        let removed = store.advance(0.3, Motion::Fall, 1.0, 600.0);
        assert_eq!(removed[0].exit, Exit::Bottom);
    }

    #[test]
    fn test_static_ttl_expires() {
        let mut store = EntityStore::new();
        let id = store.spawn(Dot::Big, Vec2::new(100.0, 400.0), 0.0, Some(1.0));
        assert!(store.advance(0.6, Motion::Static, 1.0, 600.0).is_empty());
        let removed = store.advance(0.6, Motion::Static, 1.0, 600.0);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].exit, Exit::Expired);
        assert_eq!(store.get(id).map(|e| e.pos), Some(Vec2::new(100.0, 400.0)));
    }

    #[test]
    fn test_hits_reports_all_overlapping() {
        let mut store = EntityStore::new();
        let a = store.spawn(Dot::Big, Vec2::new(100.0, 100.0), 0.0, None);
        let b = store.spawn(Dot::Small, Vec2::new(110.0, 100.0), 0.0, None);
        store.spawn(Dot::Small, Vec2::new(300.0, 100.0), 0.0, None);

        assert_eq!(store.hits(Vec2::new(105.0, 100.0)), vec![a, b]);
        assert!(store.hits(Vec2::new(500.0, 500.0)).is_empty());
    }

    #[test]
    fn test_kill_is_two_phase() {
        let mut store = EntityStore::new();
        let id = store.spawn(Dot::Small, Vec2::ZERO, 0.0, None);

        assert_eq!(store.kill(id), Some(Dot::Small));
        // Dead entities are invisible to hit tests and can't be killed twice
        assert_eq!(store.kill(id), None);
        assert!(store.hits(Vec2::ZERO).is_empty());
        assert_eq!(store.len(), 1);

        store.cleanup();
        assert!(store.is_empty());
    }

    #[test]
    fn test_nearest_in_column() {
        let mut store = EntityStore::new();
        let near = store.spawn(Dot::Small, Vec2::new(100.0, 400.0), 0.0, None);
        store.spawn(Dot::Big, Vec2::new(200.0, 300.0), 0.0, None);

        // Edge at 90, reach 40 from x=50 touches it
        assert_eq!(store.nearest_in_column(50.0, 40.0), Some(near));
        assert_eq!(store.nearest_in_column(40.0, 40.0), None);
        // Standing on top of it: gap clamps to zero
        assert_eq!(store.nearest_in_column(100.0, 0.0), Some(near));
    }
}
