//! Peripheral UI state
//!
//! Plain state machines for the screens around gameplay. They never touch the
//! simulation directly; the pause menu produces `TickInput` intents.

pub mod intro;
pub mod pause_menu;

pub use intro::{INTRO_SCENE_SECS, IntroSequence};
pub use pause_menu::{PauseChoice, PauseMenu};
