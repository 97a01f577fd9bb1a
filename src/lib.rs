//! Balance of Desire - a basket-catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, gauge, escalation, session)
//! - `tuning`: Data-driven game balance
//! - `ui`: Peripheral UI state (intro cinematic, pause menu)

pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Reference frame rate the original per-frame rates were tuned at
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1000.0;
    pub const PLAYFIELD_HEIGHT: f32 = 700.0;

    /// Session countdown (seconds)
    pub const GAME_DURATION: f32 = 180.0;

    /// Catcher (basket) defaults
    pub const CATCHER_WIDTH: f32 = 70.0;
    pub const CATCHER_HEIGHT: f32 = 15.0;
    /// Distance from the bottom edge to the catcher centre
    pub const CATCHER_Y_OFFSET: f32 = 80.0;
    /// 8 px/frame at 60 fps
    pub const CATCHER_SPEED: f32 = 8.0 * REFERENCE_FPS;

    /// Falling object defaults
    pub const OBJECT_RADIUS: f32 = 15.0;
    pub const SPAWN_MARGIN: f32 = 30.0;
    /// 3.375 px/frame at 60 fps
    pub const FALL_SPEED: f32 = 3.375 * REFERENCE_FPS;
    pub const SPAWN_INTERVAL: f32 = 2.0;

    /// Desire gauge
    pub const GAUGE_MIN: i32 = 0;
    pub const GAUGE_MAX: i32 = 100;
    pub const INITIAL_GAUGE: i32 = 50;
    pub const BAND_LOWER: i32 = 30;
    pub const BAND_UPPER: i32 = 80;
    pub const MISS_PENALTY: i32 = 10;
    pub const DECAY_INTERVAL: f32 = 10.0;
    pub const DECAY_AMOUNT: i32 = 1;

    /// Escalation
    pub const MILESTONE_STEP: u32 = 200;

    /// Largest frame delta the simulation will integrate in one call
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Sanitize a frame delta: non-finite or non-positive values become zero,
/// oversized values are clamped to `max_dt`.
#[inline]
pub fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        0.0
    } else {
        dt.min(max_dt)
    }
}

/// Format a second count as `M:SS` (whole seconds, rounded down)
pub fn format_clock(secs: f32) -> String {
    let total = secs.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(-1.0, 0.1), 0.0);
        assert_eq!(sanitize_dt(0.0, 0.1), 0.0);
        assert_eq!(sanitize_dt(f32::NAN, 0.1), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY, 0.1), 0.0);
        assert_eq!(sanitize_dt(5.0, 0.1), 0.1);
        assert!((sanitize_dt(0.016, 0.1) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180.0), "3:00");
        assert_eq!(format_clock(65.9), "1:05");
        assert_eq!(format_clock(-3.0), "0:00");
    }
}
