//! The player's basket

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Horizontal-only player actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catcher {
    /// Centre x, always within `[width / 2, playfield_width - width / 2]`
    pub x: f32,
    /// Centre y (fixed for the session)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Catcher {
    /// Catcher centred horizontally on the playfield
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            x: tuning.playfield_width / 2.0,
            y: tuning.catcher_y(),
            width: tuning.catcher_width,
            height: tuning.catcher_height,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Shift by `direction * speed * dt`; direction is -1, 0 or +1
    pub fn move_by(&mut self, direction: i8, speed: f32, dt: f32) {
        if dt <= 0.0 || !speed.is_finite() {
            return;
        }
        self.x += f32::from(direction.signum()) * speed * dt;
    }

    /// Enforce the position invariant
    pub fn clamp(&mut self, playfield_width: f32) {
        let lo = self.half_width();
        let hi = (playfield_width - self.half_width()).max(lo);
        self.x = if self.x.is_finite() {
            self.x.clamp(lo, hi)
        } else {
            playfield_width / 2.0
        };
    }

    /// Re-centre on the playfield
    pub fn reset(&mut self, playfield_width: f32) {
        self.x = playfield_width / 2.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_centred() {
        let c = Catcher::new(&Tuning::default());
        assert_eq!(c.x, PLAYFIELD_WIDTH / 2.0);
        assert_eq!(c.y, PLAYFIELD_HEIGHT - CATCHER_Y_OFFSET);
    }

    #[test]
    fn test_move_and_clamp() {
        let mut c = Catcher::new(&Tuning::default());
        c.move_by(1, CATCHER_SPEED, 0.5);
        assert_eq!(c.x, 500.0 + 240.0);
        c.move_by(1, CATCHER_SPEED, 10.0);
        c.clamp(PLAYFIELD_WIDTH);
        assert_eq!(c.x, PLAYFIELD_WIDTH - CATCHER_WIDTH / 2.0);
        c.move_by(-1, CATCHER_SPEED, 10.0);
        c.clamp(PLAYFIELD_WIDTH);
        assert_eq!(c.x, CATCHER_WIDTH / 2.0);
    }

    #[test]
    fn test_zero_direction_or_dt_holds_position() {
        let mut c = Catcher::new(&Tuning::default());
        c.move_by(0, CATCHER_SPEED, 1.0);
        c.move_by(1, CATCHER_SPEED, -1.0);
        assert_eq!(c.x, 500.0);
    }

    #[test]
    fn test_bounds() {
        let c = Catcher::new(&Tuning::default());
        let b = c.bounds();
        assert_eq!(b.width(), CATCHER_WIDTH);
        assert_eq!(b.height(), CATCHER_HEIGHT);
        assert_eq!(b.center(), Vec2::new(c.x, c.y));
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_bounds(
            moves in prop::collection::vec((-1i8..=1, 0.0f32..2.0), 0..200)
        ) {
            let mut c = Catcher::new(&Tuning::default());
            for (dir, dt) in moves {
                c.move_by(dir, CATCHER_SPEED, dt);
                c.clamp(PLAYFIELD_WIDTH);
                prop_assert!(c.x >= c.half_width());
                prop_assert!(c.x <= PLAYFIELD_WIDTH - c.half_width());
            }
        }
    }
}
