//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by object ID)
//! - Frame deltas sanitized before use
//! - No rendering, audio or input-device dependencies

pub mod catcher;
pub mod collision;
pub mod escalation;
pub mod meter;
pub mod objects;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use catcher::Catcher;
pub use collision::Aabb;
pub use escalation::{DifficultyEscalator, Escalation, MilestoneTrack, Notification};
pub use meter::{BalanceMeter, BandStatus};
pub use objects::{Category, FallingObject, FallingObjectPool};
pub use snapshot::{RenderSnapshot, VICTORY_MESSAGE};
pub use state::{GameOverReason, Phase, Session, SessionEvent};
pub use tick::{TickInput, tick};
