//! Periodic spawning and weighted kind selection

use glam::Vec2;
use rand::Rng;

use super::entity::{EntityKind, Motion};

/// Fixed probability table over a variant's entity kinds.
///
/// Selection buckets a uniform roll by cumulative weight in declaration order;
/// the last entry catches rolls that slip past the final bucket through
/// floating-point rounding.
#[derive(Debug, Clone, Copy)]
pub struct KindTable<K: 'static> {
    entries: &'static [(K, f32)],
}

impl<K: EntityKind> KindTable<K> {
    /// Panics on an empty table (a static programming error)
    pub const fn new(entries: &'static [(K, f32)]) -> Self {
        assert!(!entries.is_empty(), "kind table must not be empty");
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(K, f32)] {
        self.entries
    }

    /// Kind for a roll in [0, 1)
    pub fn pick(&self, roll: f32) -> K {
        let mut cumulative = 0.0;
        for &(kind, weight) in self.entries {
            cumulative += weight;
            if roll < cumulative {
                return kind;
            }
        }
        self.entries[self.entries.len() - 1].0
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> K {
        self.pick(rng.random::<f32>())
    }
}

/// Interval timer that turns elapsed time into a spawn count.
///
/// Driven from the tick so spawns land on the same boundary as every other
/// mutation and vanish with the session on restart.
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    accumulator: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` and return how many spawns are due. A backlog beyond
    /// `max_per_tick` is dropped rather than carried over.
    pub fn advance(&mut self, dt: f32, interval: f32, max_per_tick: u32) -> u32 {
        if interval <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let due = (self.accumulator / interval).floor() as u32;
        if due > max_per_tick {
            self.accumulator = 0.0;
            return max_per_tick;
        }
        self.accumulator -= due as f32 * interval;
        due
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Where a new entity appears: uniformly random x, y just outside the edge it
/// travels away from (or on the ground band for static entities)
pub fn spawn_position<R: Rng>(
    rng: &mut R,
    motion: Motion,
    radius: f32,
    arena: Vec2,
) -> Vec2 {
    let x_max = (arena.x - radius).max(radius);
    let x = rng.random_range(radius..=x_max);
    let y = match motion {
        Motion::Rise => arena.y + radius,
        Motion::Fall => -radius,
        Motion::Static => {
            let top = arena.y * 0.55;
            let bottom = (arena.y - radius - 40.0).max(top);
            rng.random_range(top..=bottom)
        }
    };
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Fruit {
        Apple,
        Pear,
        Plum,
        Fig,
        Kiwi,
    }

    impl EntityKind for Fruit {
        fn radius(self) -> f32 {
            10.0
        }

        fn label(self) -> &'static str {
            "fruit"
        }

        fn color(self) -> u32 {
            0x88cc44
        }
    }

    const TABLE: KindTable<Fruit> = KindTable::new(&[
        (Fruit::Apple, 0.55),
        (Fruit::Pear, 0.20),
        (Fruit::Plum, 0.10),
        (Fruit::Fig, 0.10),
        (Fruit::Kiwi, 0.05),
    ]);

    #[test]
    fn test_pick_bucket_edges() {
        assert_eq!(TABLE.pick(0.0), Fruit::Apple);
        assert_eq!(TABLE.pick(0.5499), Fruit::Apple);
        assert_eq!(TABLE.pick(0.55), Fruit::Pear);
        assert_eq!(TABLE.pick(0.80), Fruit::Plum);
        assert_eq!(TABLE.pick(0.96), Fruit::Kiwi);
        // Rounding guard: anything past the sum lands in the last bucket
        assert_eq!(TABLE.pick(1.0), Fruit::Kiwi);
        assert_eq!(TABLE.pick(1.5), Fruit::Kiwi);
    }

    #[test]
    fn test_weighted_frequencies() {
        let mut rng = Pcg32::seed_from_u64(7);
        let draws = 100_000;
        let mut counts = [0usize; 5];
        for _ in 0..draws {
            let idx = match TABLE.sample(&mut rng) {
                Fruit::Apple => 0,
                Fruit::Pear => 1,
                Fruit::Plum => 2,
                Fruit::Fig => 3,
                Fruit::Kiwi => 4,
            };
            counts[idx] += 1;
        }
        for (i, &(_, weight)) in TABLE.entries().iter().enumerate() {
            let observed = counts[i] as f32 / draws as f32;
            assert!(
                (observed - weight).abs() < 0.01,
                "bucket {} observed {} expected {}",
                i,
                observed,
                weight
            );
        }
    }

    #[test]
    fn test_spawner_independent_of_frame_rate() {
        let mut coarse = Spawner::new();
        let mut fine = Spawner::new();
        let mut coarse_total = 0;
        let mut fine_total = 0;

        for _ in 0..30 {
            coarse_total += coarse.advance(0.1, 0.5, 4);
        }
        for _ in 0..300 {
            fine_total += fine.advance(0.01, 0.5, 4);
        }
        // 3 seconds at one spawn per 0.5s
        assert!((5..=6).contains(&coarse_total));
        assert!((5..=6).contains(&fine_total));
    }

    #[test]
    fn test_spawner_caps_backlog() {
        let mut spawner = Spawner::new();
        assert_eq!(spawner.advance(10.0, 0.5, 4), 4);
        // Backlog dropped: next small step spawns nothing
        assert_eq!(spawner.advance(0.1, 0.5, 4), 0);
    }

    #[test]
    fn test_spawner_disabled_interval() {
        let mut spawner = Spawner::new();
        assert_eq!(spawner.advance(5.0, 0.0, 4), 0);
    }

    #[test]
    fn test_spawn_position_edges() {
        let mut rng = Pcg32::seed_from_u64(1);
        let arena = Vec2::new(800.0, 600.0);
        for _ in 0..100 {
            let p = spawn_position(&mut rng, Motion::Rise, 20.0, arena);
            assert!(p.x >= 20.0 && p.x <= 780.0);
            assert_eq!(p.y, 620.0);

            let p = spawn_position(&mut rng, Motion::Fall, 20.0, arena);
            assert_eq!(p.y, -20.0);

            let p = spawn_position(&mut rng, Motion::Static, 20.0, arena);
            assert!(p.y >= 330.0 && p.y <= 540.0);
        }
    }
}
