//! Renderable view of a session
//!
//! Everything an external renderer needs to draw one frame, with no access to
//! the simulation itself.

use serde::Serialize;

use super::meter::BandStatus;
use super::objects::Category;
use super::state::{Phase, Session};
use crate::consts::GAUGE_MAX;
use crate::format_clock;

/// Text shown on the victory screen
pub const VICTORY_MESSAGE: &str = "You maintained balance!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatcherView {
    /// Centre position
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub text: String,
    /// 0..=1
    pub opacity: f32,
}

/// Gauge bar mapping: every value is a fraction of the full bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeBar {
    pub fill: f32,
    pub band_start: f32,
    pub band_end: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: Phase,
    pub score: u32,
    pub elapsed_secs: f32,
    pub remaining_secs: f32,
    /// Remaining time as `M:SS`
    pub clock: String,
    pub gauge: i32,
    pub band_lower: i32,
    pub band_upper: i32,
    pub status: BandStatus,
    pub gauge_bar: GaugeBar,
    pub catcher: CatcherView,
    pub objects: Vec<ObjectView>,
    pub notifications: Vec<NotificationView>,
    /// Game-over reason or victory message; `None` while the session is live
    pub message: Option<String>,
}

impl Session {
    /// Capture everything the renderer needs for this frame
    pub fn snapshot(&self) -> RenderSnapshot {
        let (band_lower, band_upper) = self.meter.band();
        let gauge = self.meter.gauge();
        let full = GAUGE_MAX as f32;

        let message = match self.phase {
            Phase::GameOver => self.reason.map(|r| r.message().to_string()),
            Phase::Victory => Some(VICTORY_MESSAGE.to_string()),
            _ => None,
        };

        RenderSnapshot {
            phase: self.phase,
            score: self.score,
            elapsed_secs: self.elapsed,
            remaining_secs: self.remaining(),
            clock: format_clock(self.remaining()),
            gauge,
            band_lower,
            band_upper,
            status: self.meter.status(),
            gauge_bar: GaugeBar {
                fill: gauge as f32 / full,
                band_start: band_lower as f32 / full,
                band_end: band_upper as f32 / full,
            },
            catcher: CatcherView {
                x: self.catcher.x,
                y: self.catcher.y,
                width: self.catcher.width,
                height: self.catcher.height,
            },
            objects: self
                .pool
                .objects()
                .iter()
                .map(|o| ObjectView {
                    id: o.id,
                    x: o.pos.x,
                    y: o.pos.y,
                    radius: o.radius,
                    category: o.category,
                })
                .collect(),
            notifications: self
                .escalator
                .visible_notices()
                .map(|n| NotificationView {
                    text: n.text.clone(),
                    opacity: n.opacity(),
                })
                .collect(),
            message,
        }
    }
}
