//! Falling objects and the pool that spawns, advances and retires them
//!
//! The pool never touches score or gauge: catches and misses are reported back
//! to the session, which applies their effects.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::{CategoryWeights, Tuning};

/// Slowest fall speed an object may be spawned with (pixels/second)
const MIN_FALL_SPEED: f32 = 1.0;

/// Kind of falling object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Red apple: moderate score, pushes the gauge up
    Common,
    /// Golden apple: big score, pulls the gauge down a little
    RareBeneficial,
    /// Rotten apple: tiny score, pushes the gauge up sharply
    RareHarmful,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Common,
        Category::RareBeneficial,
        Category::RareHarmful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Common => "common",
            Category::RareBeneficial => "rare-beneficial",
            Category::RareHarmful => "rare-harmful",
        }
    }
}

/// A falling object entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    /// Centre position
    pub pos: Vec2,
    pub radius: f32,
    pub category: Category,
    /// Pixels per second, always positive
    pub speed: f32,
    /// False once caught or missed
    pub alive: bool,
}

impl FallingObject {
    pub fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }

    /// True once the object's top edge has passed below the playfield
    pub fn is_below(&self, playfield_height: f32) -> bool {
        self.pos.y - self.radius > playfield_height
    }

    fn retire(mut self) -> Self {
        self.alive = false;
        self
    }
}

/// Owns every active falling object
///
/// Generic over the random source so tests can inject any seeded RNG.
#[derive(Debug, Clone)]
pub struct FallingObjectPool<R = Pcg32> {
    /// Active objects, sorted by id
    objects: Vec<FallingObject>,
    rng: R,
    radius: f32,
    margin: f32,
    weights: CategoryWeights,
    next_id: u32,
}

impl FallingObjectPool<Pcg32> {
    /// Pool driven by a PCG stream seeded from `seed`
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed), tuning)
    }
}

impl<R: Rng> FallingObjectPool<R> {
    pub fn with_rng(rng: R, tuning: &Tuning) -> Self {
        Self {
            objects: Vec::new(),
            rng,
            radius: tuning.object_radius,
            margin: tuning.spawn_margin,
            weights: tuning.weights,
            next_id: 1,
        }
    }

    pub fn objects(&self) -> &[FallingObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every active object. Ids keep counting so none is ever reused.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Spawn one object just above the top edge at a random x
    pub fn spawn(&mut self, playfield_width: f32, current_speed: f32) -> FallingObject {
        let lo = self.margin;
        let hi = playfield_width - self.margin;
        let x = if lo < hi {
            self.rng.random_range(lo..hi)
        } else {
            playfield_width * 0.5
        };

        let total = self.weights.total().max(1);
        let category = self.weights.pick(self.rng.random_range(0..total));

        let object = FallingObject {
            id: self.next_id,
            pos: Vec2::new(x, -self.radius),
            radius: self.radius,
            category,
            speed: current_speed.max(MIN_FALL_SPEED),
            alive: true,
        };
        self.next_id += 1;
        self.objects.push(object);
        object
    }

    /// Move every object down by `speed * dt`
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for object in &mut self.objects {
            object.pos.y += object.speed * dt;
        }
    }

    /// Remove and report every object that intersects the catcher
    pub fn check_collisions(&mut self, catcher_bounds: &Aabb) -> Vec<FallingObject> {
        self.take_where(|o| o.bounds().intersects(catcher_bounds))
    }

    /// Remove and report every object that has left the bottom of the playfield
    pub fn retire_offscreen(&mut self, playfield_height: f32) -> Vec<FallingObject> {
        self.take_where(|o| o.is_below(playfield_height))
    }

    fn take_where(&mut self, mut pred: impl FnMut(&FallingObject) -> bool) -> Vec<FallingObject> {
        let mut taken = Vec::new();
        self.objects.retain(|o| {
            if pred(o) {
                taken.push(o.retire());
                false
            } else {
                true
            }
        });
        taken
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, pos: Vec2, category: Category, speed: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(FallingObject {
            id,
            pos,
            radius: self.radius,
            category,
            speed,
            alive: true,
        });
        id
    }
}
