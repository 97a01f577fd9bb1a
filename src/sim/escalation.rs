//! Progressive difficulty keyed to score milestones
//!
//! Two independent tracks share one step size. The speed track fires on the
//! odd multiples of the step (200, 600, 1000, ...), the band track on the even
//! ones (400, 800, 1200, ...). Each track keeps a monotone watermark of the next
//! milestone it has not fired yet, so no threshold fires twice.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A milestone sequence `first, first + period, first + 2 * period, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneTrack {
    step: u32,
    first: u32,
    period: u32,
    /// Next milestone that has not fired
    next: u32,
    /// Most recent milestone that fired
    last: Option<u32>,
}

impl MilestoneTrack {
    pub fn new(step: u32, first: u32, period: u32) -> Self {
        let step = step.max(1);
        Self {
            step,
            first,
            period: period.max(1),
            next: first,
            last: None,
        }
    }

    pub fn last(&self) -> Option<u32> {
        self.last
    }

    /// Fire every not-yet-fired milestone at or below `floor(score / step) * step`.
    /// Returns the milestones fired, in increasing order.
    pub fn observe(&mut self, score: u32) -> Vec<u32> {
        let reached = score / self.step * self.step;
        let mut fired = Vec::new();
        while self.next <= reached {
            fired.push(self.next);
            self.last = Some(self.next);
            self.next = self.next.saturating_add(self.period);
            if self.next == u32::MAX {
                break;
            }
        }
        fired
    }

    /// Re-arm from the first milestone
    pub fn reset(&mut self) {
        self.next = self.first;
        self.last = None;
    }
}

/// A timed on-screen message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    /// Seconds left on screen; hidden once this reaches zero
    pub remaining: f32,
    pub duration: f32,
    pub fade: f32,
}

impl Notification {
    pub fn hidden() -> Self {
        Self {
            text: String::new(),
            remaining: 0.0,
            duration: 0.0,
            fade: 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.remaining > 0.0
    }

    /// Linear fade in over the first `fade` seconds, out over the last `fade`
    pub fn opacity(&self) -> f32 {
        if !self.is_visible() {
            return 0.0;
        }
        if self.fade <= 0.0 {
            return 1.0;
        }
        let elapsed = self.duration - self.remaining;
        let fade_in = (elapsed / self.fade).clamp(0.0, 1.0);
        let fade_out = (self.remaining / self.fade).clamp(0.0, 1.0);
        fade_in.min(fade_out)
    }

    fn show(&mut self, text: String, duration: f32, fade: f32) {
        self.text = text;
        self.duration = duration;
        self.remaining = duration;
        self.fade = fade;
    }

    fn tick(&mut self, dt: f32) {
        if self.is_visible() {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }
}

/// One escalation step raised by a milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Escalation {
    Speed { milestone: u32, fall_speed: f32 },
    Band { milestone: u32, lower: i32, upper: i32 },
}

/// Tracks milestones and the escalated speeds and band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyEscalator {
    speed_track: MilestoneTrack,
    band_track: MilestoneTrack,

    base_fall_speed: f32,
    fall_speed: f32,
    base_catcher_speed: f32,
    catcher_speed: f32,
    base_spawn_interval: f32,
    spawn_interval: f32,

    base_band: (i32, i32),
    band: (i32, i32),

    speed_notice: Notification,
    band_notice: Notification,

    speed_factor: f32,
    catcher_speed_bonus: f32,
    spawn_interval_factor: f32,
    min_spawn_interval: f32,
    band_narrow_per_side: i32,
    band_max_lower: i32,
    band_min_upper: i32,
    notification_secs: f32,
    notification_fade_secs: f32,
}

impl DifficultyEscalator {
    pub fn new(tuning: &Tuning) -> Self {
        let step = tuning.milestone_step.max(1);
        let base_band = (tuning.band_lower, tuning.band_upper);
        Self {
            speed_track: MilestoneTrack::new(step, step, step.saturating_mul(2)),
            band_track: MilestoneTrack::new(
                step,
                step.saturating_mul(2),
                step.saturating_mul(2),
            ),
            base_fall_speed: tuning.fall_speed,
            fall_speed: tuning.fall_speed,
            base_catcher_speed: tuning.catcher_speed,
            catcher_speed: tuning.catcher_speed,
            base_spawn_interval: tuning.spawn_interval_secs,
            spawn_interval: tuning.spawn_interval_secs,
            base_band,
            band: base_band,
            speed_notice: Notification::hidden(),
            band_notice: Notification::hidden(),
            speed_factor: tuning.speed_factor,
            catcher_speed_bonus: tuning.catcher_speed_bonus,
            spawn_interval_factor: tuning.spawn_interval_factor,
            min_spawn_interval: tuning.min_spawn_interval_secs,
            band_narrow_per_side: tuning.band_narrow_per_side,
            band_max_lower: tuning.band_max_lower,
            band_min_upper: tuning.band_min_upper,
            notification_secs: tuning.notification_secs,
            notification_fade_secs: tuning.notification_fade_secs,
        }
    }

    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    pub fn catcher_speed(&self) -> f32 {
        self.catcher_speed
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn band(&self) -> (i32, i32) {
        self.band
    }

    pub fn speed_track(&self) -> &MilestoneTrack {
        &self.speed_track
    }

    pub fn band_track(&self) -> &MilestoneTrack {
        &self.band_track
    }

    pub fn speed_notice(&self) -> &Notification {
        &self.speed_notice
    }

    pub fn band_notice(&self) -> &Notification {
        &self.band_notice
    }

    /// Visible notifications, speed track first
    pub fn visible_notices(&self) -> impl Iterator<Item = &Notification> {
        [&self.speed_notice, &self.band_notice]
            .into_iter()
            .filter(|n| n.is_visible())
    }

    /// Check both tracks against the new score and apply whatever fired
    pub fn on_score_changed(&mut self, score: u32) -> Vec<Escalation> {
        let mut raised = Vec::new();

        let speed_hits = self.speed_track.observe(score);
        for &milestone in &speed_hits {
            self.fall_speed *= self.speed_factor;
            self.catcher_speed += self.catcher_speed_bonus;
            self.spawn_interval =
                (self.spawn_interval * self.spawn_interval_factor).max(self.min_spawn_interval);
            log::info!(
                "Speed milestone {}: fall speed {:.1}, catcher speed {:.1}",
                milestone,
                self.fall_speed,
                self.catcher_speed
            );
            raised.push(Escalation::Speed {
                milestone,
                fall_speed: self.fall_speed,
            });
        }
        if !speed_hits.is_empty() {
            self.speed_notice.show(
                "Speed up! Apples fall faster".to_string(),
                self.notification_secs,
                self.notification_fade_secs,
            );
        }

        let band_hits = self.band_track.observe(score);
        for &milestone in &band_hits {
            self.narrow_band();
            log::info!(
                "Band milestone {}: safe zone {}-{}",
                milestone,
                self.band.0,
                self.band.1
            );
            raised.push(Escalation::Band {
                milestone,
                lower: self.band.0,
                upper: self.band.1,
            });
        }
        if !band_hits.is_empty() {
            self.band_notice.show(
                format!("Balance narrows! Safe zone {}-{}", self.band.0, self.band.1),
                self.notification_secs,
                self.notification_fade_secs,
            );
        }

        raised
    }

    fn narrow_band(&mut self) {
        let (lower, upper) = self.band;
        let mut lower = lower.saturating_add(self.band_narrow_per_side).min(self.band_max_lower);
        let mut upper = upper.saturating_sub(self.band_narrow_per_side).max(self.band_min_upper);
        // Clamps never widen a band that was already tighter
        lower = lower.max(self.band.0);
        upper = upper.min(self.band.1);
        if lower > upper {
            let mid = (lower + upper) / 2;
            lower = mid;
            upper = mid;
        }
        self.band = (lower, upper);
    }

    /// Count down both notification timers
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.speed_notice.tick(dt);
        self.band_notice.tick(dt);
    }

    /// Back to base speeds and band with every milestone re-armed
    pub fn reset(&mut self) {
        self.speed_track.reset();
        self.band_track.reset();
        self.fall_speed = self.base_fall_speed;
        self.catcher_speed = self.base_catcher_speed;
        self.spawn_interval = self.base_spawn_interval;
        self.band = self.base_band;
        self.speed_notice = Notification::hidden();
        self.band_notice = Notification::hidden();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn escalator() -> DifficultyEscalator {
        DifficultyEscalator::new(&Tuning::default())
    }

    fn milestones(raised: &[Escalation]) -> (Vec<u32>, Vec<u32>) {
        let mut speed = Vec::new();
        let mut band = Vec::new();
        for e in raised {
            match *e {
                Escalation::Speed { milestone, .. } => speed.push(milestone),
                Escalation::Band { milestone, .. } => band.push(milestone),
            }
        }
        (speed, band)
    }

    #[test]
    fn test_tracks_alternate() {
        let mut e = escalator();
        let mut all = Vec::new();
        for score in (0..=900).step_by(5) {
            all.extend(e.on_score_changed(score));
        }
        let (speed, band) = milestones(&all);
        assert_eq!(speed, vec![200, 600]);
        assert_eq!(band, vec![400, 800]);
    }

    #[test]
    fn test_fires_once_per_threshold() {
        let mut e = escalator();
        assert_eq!(e.on_score_changed(210).len(), 1);
        assert!(e.on_score_changed(210).is_empty());
        assert!(e.on_score_changed(395).is_empty());
        assert_eq!(e.speed_track().last(), Some(200));
        assert_eq!(e.band_track().last(), None);
    }

    #[test]
    fn test_jump_crosses_several_milestones() {
        let mut e = escalator();
        let raised = e.on_score_changed(650);
        let (speed, band) = milestones(&raised);
        assert_eq!(speed, vec![200, 600]);
        assert_eq!(band, vec![400]);
        assert!((e.fall_speed() - FALL_SPEED * 1.5 * 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_speed_milestone_effects() {
        let mut e = escalator();
        e.on_score_changed(200);
        assert!((e.fall_speed() - FALL_SPEED * 1.5).abs() < 1e-3);
        assert!((e.catcher_speed() - (CATCHER_SPEED + 120.0)).abs() < 1e-3);
        assert!((e.spawn_interval() - 1.7).abs() < 1e-4);
        assert!(e.speed_notice().is_visible());
        assert!(!e.band_notice().is_visible());
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut e = escalator();
        e.on_score_changed(20_000);
        assert!((e.spawn_interval() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_band_narrows_to_minimum() {
        let mut e = escalator();
        e.on_score_changed(400);
        assert_eq!(e.band(), (35, 75));
        assert!(e.band_notice().is_visible());
        assert_eq!(e.band_notice().text, "Balance narrows! Safe zone 35-75");
        e.on_score_changed(10_000);
        assert_eq!(e.band(), (45, 55));
    }

    #[test]
    fn test_extreme_narrowing_saturates() {
        let mut tuning = Tuning::default();
        tuning.band_narrow_per_side = i32::MAX;
        let mut e = DifficultyEscalator::new(&tuning);
        e.on_score_changed(400);
        assert_eq!(e.band(), (45, 55));

        tuning.band_narrow_per_side = i32::MIN;
        let mut e = DifficultyEscalator::new(&tuning);
        e.on_score_changed(400);
        assert_eq!(e.band(), (30, 80));
    }

    #[test]
    fn test_notifications_expire_independently() {
        let mut e = escalator();
        e.on_score_changed(200);
        e.tick(2.0);
        e.on_score_changed(400);
        e.tick(1.5);
        assert!(!e.speed_notice().is_visible());
        assert!(e.band_notice().is_visible());
        assert_eq!(e.visible_notices().count(), 1);
        e.tick(2.0);
        assert_eq!(e.visible_notices().count(), 0);
    }

    #[test]
    fn test_notification_opacity_curve() {
        let mut n = Notification::hidden();
        assert_eq!(n.opacity(), 0.0);
        n.show("x".into(), 3.0, 0.5);
        assert_eq!(n.opacity(), 0.0);
        n.tick(0.25);
        assert!((n.opacity() - 0.5).abs() < 1e-4);
        n.tick(1.0);
        assert_eq!(n.opacity(), 1.0);
        n.tick(1.5);
        assert!((n.opacity() - 0.5).abs() < 1e-4);
        n.tick(1.0);
        assert!(!n.is_visible());
        assert_eq!(n.opacity(), 0.0);
    }

    #[test]
    fn test_reset_rearms_tracks() {
        let mut e = escalator();
        e.on_score_changed(900);
        e.reset();
        assert_eq!(e, escalator());
        let (speed, band) = milestones(&e.on_score_changed(450));
        assert_eq!(speed, vec![200]);
        assert_eq!(band, vec![400]);
    }

    #[test]
    fn test_custom_step() {
        let tuning = Tuning {
            milestone_step: 100,
            ..Tuning::default()
        };
        let mut e = DifficultyEscalator::new(&tuning);
        let (speed, band) = milestones(&e.on_score_changed(400));
        assert_eq!(speed, vec![100, 300]);
        assert_eq!(band, vec![200, 400]);
    }
}
