//! The desire gauge and its safe band

use serde::{Deserialize, Serialize};

use super::objects::Category;
use crate::consts::{GAUGE_MAX, GAUGE_MIN};
use crate::tuning::{CategoryEffects, Tuning};

/// Where the gauge sits relative to the current safe band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandStatus {
    BelowBand,
    InBand,
    AboveBand,
}

/// Gauge value plus the (possibly escalated) inclusive safe band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceMeter {
    gauge: i32,
    lower: i32,
    upper: i32,
    base_lower: i32,
    base_upper: i32,
    initial_gauge: i32,
    /// Seconds accumulated toward the next decay step
    decay_timer: f32,
    decay_interval: f32,
    decay_amount: i32,
    miss_penalty: i32,
    effects: CategoryEffects,
}

impl BalanceMeter {
    pub fn new(tuning: &Tuning) -> Self {
        let base_lower = tuning.band_lower.clamp(GAUGE_MIN, GAUGE_MAX);
        let base_upper = tuning.band_upper.clamp(base_lower, GAUGE_MAX);
        let initial_gauge = tuning.initial_gauge.clamp(GAUGE_MIN, GAUGE_MAX);
        Self {
            gauge: initial_gauge,
            lower: base_lower,
            upper: base_upper,
            base_lower,
            base_upper,
            initial_gauge,
            decay_timer: 0.0,
            decay_interval: tuning.decay_interval_secs,
            decay_amount: tuning.decay_amount,
            miss_penalty: tuning.miss_penalty,
            effects: tuning.effects,
        }
    }

    pub fn gauge(&self) -> i32 {
        self.gauge
    }

    /// Current `(lower, upper)` band
    pub fn band(&self) -> (i32, i32) {
        (self.lower, self.upper)
    }

    /// The band the session started with
    pub fn base_band(&self) -> (i32, i32) {
        (self.base_lower, self.base_upper)
    }

    pub fn decay_timer(&self) -> f32 {
        self.decay_timer
    }

    /// Shift the gauge by `delta`, clamped to `[0, 100]`
    pub fn apply_delta(&mut self, delta: i32) -> i32 {
        self.gauge = self.gauge.saturating_add(delta).clamp(GAUGE_MIN, GAUGE_MAX);
        self.gauge
    }

    /// Apply the gauge effect of collecting an object; score is the caller's job
    pub fn apply_collection(&mut self, category: Category) -> i32 {
        self.apply_delta(self.effects.get(category).gauge)
    }

    /// Apply the fixed penalty for an object that reached the bottom
    pub fn apply_miss(&mut self) -> i32 {
        self.apply_delta(self.miss_penalty.saturating_neg())
    }

    /// Accumulate `dt`; once the accumulator exceeds the decay interval the
    /// gauge drops by the decay amount and the accumulator restarts.
    /// Returns true if a decay step was applied.
    pub fn apply_decay(&mut self, dt: f32) -> bool {
        if dt <= 0.0 {
            return false;
        }
        self.decay_timer += dt;
        if self.decay_timer > self.decay_interval {
            self.decay_timer = 0.0;
            self.apply_delta(self.decay_amount.saturating_neg());
            true
        } else {
            false
        }
    }

    /// Replace the band; bounds are clamped to the gauge range and kept ordered
    pub fn set_band(&mut self, lower: i32, upper: i32) {
        let lower = lower.clamp(GAUGE_MIN, GAUGE_MAX);
        let upper = upper.clamp(GAUGE_MIN, GAUGE_MAX);
        if lower <= upper {
            self.lower = lower;
            self.upper = upper;
        } else {
            let mid = (lower + upper) / 2;
            self.lower = mid;
            self.upper = mid;
        }
    }

    pub fn status(&self) -> BandStatus {
        if self.gauge < self.lower {
            BandStatus::BelowBand
        } else if self.gauge > self.upper {
            BandStatus::AboveBand
        } else {
            BandStatus::InBand
        }
    }

    /// Restore starting gauge, base band and a zeroed decay accumulator
    pub fn reset(&mut self) {
        self.gauge = self.initial_gauge;
        self.lower = self.base_lower;
        self.upper = self.base_upper;
        self.decay_timer = 0.0;
    }

    #[cfg(test)]
    pub(crate) fn set_gauge(&mut self, gauge: i32) {
        self.gauge = gauge.clamp(GAUGE_MIN, GAUGE_MAX);
    }
}
