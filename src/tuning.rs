//! Data-driven game balance
//!
//! Every number the simulation reads comes from [`Tuning`]. Defaults match the
//! reference balance; JSON files may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Category;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Score and gauge effect of collecting one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEffect {
    pub score: u32,
    pub gauge: i32,
}

/// Relative spawn weights per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub common: u32,
    pub rare_beneficial: u32,
    pub rare_harmful: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            common: 60,
            rare_beneficial: 20,
            rare_harmful: 20,
        }
    }
}

impl CategoryWeights {
    pub fn total(&self) -> u32 {
        self.common + self.rare_beneficial + self.rare_harmful
    }

    /// Map a roll in `0..total()` to a category
    pub fn pick(&self, roll: u32) -> Category {
        if roll < self.common {
            Category::Common
        } else if roll < self.common + self.rare_beneficial {
            Category::RareBeneficial
        } else {
            Category::RareHarmful
        }
    }
}

/// Collection effects for the three categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryEffects {
    pub common: CategoryEffect,
    pub rare_beneficial: CategoryEffect,
    pub rare_harmful: CategoryEffect,
}

impl Default for CategoryEffects {
    fn default() -> Self {
        Self {
            common: CategoryEffect { score: 20, gauge: 20 },
            rare_beneficial: CategoryEffect { score: 80, gauge: -10 },
            rare_harmful: CategoryEffect { score: 5, gauge: 40 },
        }
    }
}

impl CategoryEffects {
    pub fn get(&self, category: Category) -> CategoryEffect {
        match category {
            Category::Common => self.common,
            Category::RareBeneficial => self.rare_beneficial,
            Category::RareHarmful => self.rare_harmful,
        }
    }
}

/// Full balance sheet for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Session countdown in seconds
    pub duration_secs: f32,
    /// Largest frame delta integrated in one tick
    pub max_frame_dt: f32,

    // === Catcher ===
    pub catcher_width: f32,
    pub catcher_height: f32,
    pub catcher_y_offset: f32,
    /// Pixels per second
    pub catcher_speed: f32,

    // === Falling objects ===
    pub object_radius: f32,
    pub spawn_margin: f32,
    /// Pixels per second
    pub fall_speed: f32,
    pub spawn_interval_secs: f32,
    pub min_spawn_interval_secs: f32,
    /// Applied to the spawn interval at each speed milestone
    pub spawn_interval_factor: f32,
    pub weights: CategoryWeights,
    pub effects: CategoryEffects,

    // === Gauge ===
    pub initial_gauge: i32,
    pub band_lower: i32,
    pub band_upper: i32,
    pub miss_penalty: i32,
    pub decay_interval_secs: f32,
    pub decay_amount: i32,

    // === Escalation ===
    pub milestone_step: u32,
    pub speed_factor: f32,
    pub catcher_speed_bonus: f32,
    pub band_narrow_per_side: i32,
    /// Narrowing never raises the lower bound above this
    pub band_max_lower: i32,
    /// Narrowing never drops the upper bound below this
    pub band_min_upper: i32,
    pub notification_secs: f32,
    pub notification_fade_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            duration_secs: GAME_DURATION,
            max_frame_dt: MAX_FRAME_DT,

            catcher_width: CATCHER_WIDTH,
            catcher_height: CATCHER_HEIGHT,
            catcher_y_offset: CATCHER_Y_OFFSET,
            catcher_speed: CATCHER_SPEED,

            object_radius: OBJECT_RADIUS,
            spawn_margin: SPAWN_MARGIN,
            fall_speed: FALL_SPEED,
            spawn_interval_secs: SPAWN_INTERVAL,
            min_spawn_interval_secs: 1.0,
            spawn_interval_factor: 0.85,
            weights: CategoryWeights::default(),
            effects: CategoryEffects::default(),

            initial_gauge: INITIAL_GAUGE,
            band_lower: BAND_LOWER,
            band_upper: BAND_UPPER,
            miss_penalty: MISS_PENALTY,
            decay_interval_secs: DECAY_INTERVAL,
            decay_amount: DECAY_AMOUNT,

            milestone_step: MILESTONE_STEP,
            speed_factor: 1.5,
            catcher_speed_bonus: 2.0 * REFERENCE_FPS,
            band_narrow_per_side: 5,
            band_max_lower: 45,
            band_min_upper: 55,
            notification_secs: 3.0,
            notification_fade_secs: 0.5,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject configurations that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| -> Result<(), TuningError> { Err(TuningError::Invalid(msg)) };

        if !(self.playfield_width > 0.0 && self.playfield_height > 0.0) {
            return invalid(format!(
                "playfield must be positive, got {}x{}",
                self.playfield_width, self.playfield_height
            ));
        }
        if !(self.catcher_height > 0.0 && self.object_radius > 0.0) {
            return invalid(format!(
                "catcher height {} and object radius {} must be positive",
                self.catcher_height, self.object_radius
            ));
        }
        if !(self.catcher_width > 0.0 && self.catcher_width <= self.playfield_width) {
            return invalid(format!(
                "catcher width {} must fit the playfield width {}",
                self.catcher_width, self.playfield_width
            ));
        }
        if 2.0 * self.spawn_margin > self.playfield_width {
            return invalid(format!("spawn margin {} leaves no spawn area", self.spawn_margin));
        }
        if !(self.duration_secs > 0.0 && self.max_frame_dt > 0.0) {
            return invalid("duration and max frame delta must be positive".into());
        }
        if !(self.fall_speed > 0.0 && self.speed_factor >= 1.0) {
            return invalid("fall speed must be positive and speed factor at least 1".into());
        }
        if !(self.spawn_interval_secs > 0.0 && self.min_spawn_interval_secs > 0.0) {
            return invalid("spawn intervals must be positive".into());
        }
        if !(self.decay_interval_secs > 0.0) {
            return invalid("decay interval must be positive".into());
        }
        if self.weights.total() == 0 {
            return invalid("category weights sum to zero".into());
        }
        let in_gauge = |v: i32| (GAUGE_MIN..=GAUGE_MAX).contains(&v);
        if !(in_gauge(self.band_lower) && in_gauge(self.band_upper))
            || self.band_lower > self.band_upper
        {
            return invalid(format!(
                "band [{}, {}] must be ordered and within [{GAUGE_MIN}, {GAUGE_MAX}]",
                self.band_lower, self.band_upper
            ));
        }
        if self.miss_penalty < 0 || self.decay_amount < 0 {
            return invalid(format!(
                "miss penalty {} and decay amount {} must not be negative",
                self.miss_penalty, self.decay_amount
            ));
        }
        let span = GAUGE_MAX - GAUGE_MIN;
        for category in Category::ALL {
            let gauge = self.effects.get(category).gauge;
            if !(-span..=span).contains(&gauge) {
                return invalid(format!(
                    "{} gauge effect {} outside [-{span}, {span}]",
                    category.as_str(),
                    gauge
                ));
            }
        }
        if !(0..=span).contains(&self.band_narrow_per_side) {
            return invalid(format!(
                "band narrowing {} outside [0, {span}]",
                self.band_narrow_per_side
            ));
        }
        if self.band_max_lower > self.band_min_upper {
            return invalid(format!(
                "narrowing clamps cross: max lower {} > min upper {}",
                self.band_max_lower, self.band_min_upper
            ));
        }
        if !in_gauge(self.initial_gauge) {
            return invalid(format!("initial gauge {} out of range", self.initial_gauge));
        }
        if self.milestone_step == 0 {
            return invalid("milestone step must be non-zero".into());
        }
        Ok(())
    }

    /// Catcher centre line, measured from the top of the playfield
    pub fn catcher_y(&self) -> f32 {
        self.playfield_height - self.catcher_y_offset
    }
}
