//! Intro cinematic sequencer
//!
//! Six captioned scenes, five seconds each, looping until the player starts.

use crate::sanitize_dt;
use crate::sim::Category;

/// Seconds each scene stays on screen
pub const INTRO_SCENE_SECS: f32 = 5.0;

const SCENES: [(&str, &[Category]); 6] = [
    (
        "A single red apple falls from the sky...\n\n\"The apple reflects the desire of mankind.\"",
        &[Category::Common],
    ),
    (
        "A golden apple descends slowly...\n\n\"Some desires shine brighter than others...\"\n\"...tempting, precious, yet fleeting.\"",
        &[Category::RareBeneficial],
    ),
    (
        "The light fades. A rotten apple drops...\n\n\"But every desire carries danger within.\"\n\"Corruption follows those who crave too much.\"",
        &[Category::RareHarmful],
    ),
    (
        "Golden and rotten apples fall together...\n\n\"We must choose...\"\n\"Which desire will we fulfill?\"",
        &[Category::RareBeneficial, Category::RareHarmful],
    ),
    (
        "Hundreds of apples fall from the sky...\n\n\"At times, choice is not a gift...\"\n\"...but a necessity.\"",
        &Category::ALL,
    ),
    (
        "\"How will you endure your own desire?\"\n\"Find the balance... or be devoured by it.\"\n\n\nPress SPACE to begin\nUse Arrow Keys or A/D to move",
        &[],
    ),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntroSequence {
    scene: usize,
    scene_timer: f32,
}

impl IntroSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> usize {
        self.scene
    }

    pub fn scene_count() -> usize {
        SCENES.len()
    }

    pub fn caption(&self) -> &'static str {
        SCENES[self.scene].0
    }

    /// Categories the current scene shows falling
    pub fn featured(&self) -> &'static [Category] {
        SCENES[self.scene].1
    }

    /// Fraction of the current scene already shown
    pub fn scene_progress(&self) -> f32 {
        (self.scene_timer / INTRO_SCENE_SECS).clamp(0.0, 1.0)
    }

    /// The closing scene carries the start prompt
    pub fn is_prompt_scene(&self) -> bool {
        self.scene == SCENES.len() - 1
    }

    /// Advance the scene clock; returns true when the scene changed
    pub fn tick(&mut self, dt: f32) -> bool {
        let dt = sanitize_dt(dt, INTRO_SCENE_SECS);
        self.scene_timer += dt;
        if self.scene_timer > INTRO_SCENE_SECS {
            self.scene_timer = 0.0;
            self.scene = (self.scene + 1) % SCENES.len();
            log::debug!("Intro scene {}", self.scene);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
