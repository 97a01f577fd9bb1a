//! Session state and core simulation types
//!
//! The session owns every gameplay component and is the only thing that
//! mutates them.

use serde::{Deserialize, Serialize};

use super::catcher::Catcher;
use super::escalation::DifficultyEscalator;
use super::meter::{BalanceMeter, BandStatus};
use super::objects::{Category, FallingObjectPool};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Title / cinematic, waiting for start input
    Intro,
    /// Active gameplay
    Playing,
    /// Everything frozen, pause menu open
    Paused,
    /// Gauge left the band, or the clock ran out outside it
    GameOver,
    /// Clock ran out with the gauge inside the band
    Victory,
}

/// Why a session ended in defeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Gauge fell below the band
    Apathy,
    /// Gauge rose above the band
    Obsession,
    /// Countdown expired with the gauge outside the band
    TimeUp,
}

impl GameOverReason {
    /// Out-of-band reason for a mid-game breach; `None` while in band
    pub fn from_status(status: BandStatus) -> Option<Self> {
        match status {
            BandStatus::BelowBand => Some(Self::Apathy),
            BandStatus::AboveBand => Some(Self::Obsession),
            BandStatus::InBand => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Apathy => "Apathy - You lost the will to live",
            Self::Obsession => "Obsession - Consumed by greed",
            Self::TimeUp => "Time's up!",
        }
    }
}

/// Things that happened during a tick, for audio and feedback hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    Paused,
    Resumed,
    Restarted,
    Quit,
    /// Restart pressed on an end screen
    ReturnedToIntro,
    Spawned { id: u32, category: Category },
    Caught { id: u32, category: Category },
    Missed { id: u32, category: Category },
    Decayed { gauge: i32 },
    SpeedEscalated { milestone: u32 },
    BandNarrowed { milestone: u32, lower: i32, upper: i32 },
    GameOver(GameOverReason),
    Victory,
}

/// One play session: state machine, score, clocks and owned components
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the falling-object stream was created from
    pub seed: u64,
    pub phase: Phase,
    pub score: u32,
    /// Seconds of play since the last reset
    pub elapsed: f32,
    /// Seconds accumulated toward the next spawn
    pub spawn_timer: f32,
    pub catcher: Catcher,
    pub pool: FallingObjectPool,
    pub meter: BalanceMeter,
    pub escalator: DifficultyEscalator,
    /// Set when the phase is `GameOver`
    pub reason: Option<GameOverReason>,
    tuning: Tuning,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Create a session in the `Intro` phase
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: Phase::Intro,
            score: 0,
            elapsed: 0.0,
            spawn_timer: 0.0,
            catcher: Catcher::new(&tuning),
            pool: FallingObjectPool::new(seed, &tuning),
            meter: BalanceMeter::new(&tuning),
            escalator: DifficultyEscalator::new(&tuning),
            reason: None,
            tuning,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Seconds left on the countdown, never negative
    pub fn remaining(&self) -> f32 {
        (self.tuning.duration_secs - self.elapsed).max(0.0)
    }

    /// Reinitialise score, clocks, gauge, band, escalation, catcher and objects.
    /// Does not change the phase.
    pub fn reset(&mut self) {
        self.score = 0;
        self.elapsed = 0.0;
        self.spawn_timer = 0.0;
        self.reason = None;
        self.catcher.reset(self.tuning.playfield_width);
        self.pool.clear();
        self.meter.reset();
        self.escalator.reset();
    }

    /// Move to a new phase, logging the transition
    pub fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    pub(crate) fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Take and clear the recorded events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// End in defeat
    pub(crate) fn lose(&mut self, reason: GameOverReason) {
        log::info!(
            "Game over ({:?}): score {}, gauge {}",
            reason,
            self.score,
            self.meter.gauge()
        );
        self.reason = Some(reason);
        self.set_phase(Phase::GameOver);
        self.emit(SessionEvent::GameOver(reason));
    }

    /// End in victory
    pub(crate) fn win(&mut self) {
        log::info!(
            "Victory: score {}, gauge {}",
            self.score,
            self.meter.gauge()
        );
        self.reason = None;
        self.set_phase(Phase::Victory);
        self.emit(SessionEvent::Victory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{TickInput, tick};
    use proptest::prelude::*;

    /// Everything `reset` is responsible for; ids and RNG position excluded
    type ResetView = (
        u32,
        f32,
        f32,
        Catcher,
        usize,
        BalanceMeter,
        DifficultyEscalator,
        Option<GameOverReason>,
    );

    fn reset_view(s: &Session) -> ResetView {
        (
            s.score,
            s.elapsed,
            s.spawn_timer,
            s.catcher.clone(),
            s.pool.len(),
            s.meter.clone(),
            s.escalator.clone(),
            s.reason,
        )
    }

    #[test]
    fn test_new_session_in_intro() {
        let s = Session::new(1, Tuning::default());
        assert_eq!(s.phase, Phase::Intro);
        assert_eq!(s.score, 0);
        assert_eq!(s.meter.gauge(), 50);
        assert_eq!(s.remaining(), GAME_DURATION);
        assert!(s.pool.is_empty());
    }

    #[test]
    fn test_reason_from_status() {
        assert_eq!(
            GameOverReason::from_status(BandStatus::BelowBand),
            Some(GameOverReason::Apathy)
        );
        assert_eq!(
            GameOverReason::from_status(BandStatus::AboveBand),
            Some(GameOverReason::Obsession)
        );
        assert_eq!(GameOverReason::from_status(BandStatus::InBand), None);
        assert_eq!(GameOverReason::TimeUp.message(), "Time's up!");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut s = Session::new(5, Tuning::default());
        s.score = 640;
        s.elapsed = 77.0;
        s.spawn_timer = 1.2;
        s.catcher.x = 100.0;
        s.pool.spawn(PLAYFIELD_WIDTH, FALL_SPEED);
        s.meter.apply_collection(Category::RareHarmful);
        s.meter.apply_decay(3.0);
        s.escalator.on_score_changed(640);
        s.meter.set_band(40, 70);
        s.reason = Some(GameOverReason::Obsession);

        s.reset();
        let once = (
            s.score,
            s.elapsed,
            s.spawn_timer,
            s.catcher.clone(),
            s.pool.len(),
            s.meter.clone(),
            s.escalator.clone(),
            s.reason,
        );
        s.reset();
        let twice = (
            s.score,
            s.elapsed,
            s.spawn_timer,
            s.catcher.clone(),
            s.pool.len(),
            s.meter.clone(),
            s.escalator.clone(),
            s.reason,
        );
        assert_eq!(once, twice);
        assert_eq!(s.score, 0);
        assert_eq!(s.meter.gauge(), 50);
        assert_eq!(s.meter.band(), s.meter.base_band());
        assert_eq!(s.escalator.band(), (BAND_LOWER, BAND_UPPER));
        assert!(s.pool.is_empty());
        assert_eq!(s.catcher.x, PLAYFIELD_WIDTH / 2.0);
        assert_eq!(s.meter.decay_timer(), 0.0);
    }

    #[test]
    fn test_drain_events() {
        let mut s = Session::new(1, Tuning::default());
        s.emit(SessionEvent::Started);
        assert_eq!(s.events().len(), 1);
        assert_eq!(s.drain_events(), vec![SessionEvent::Started]);
        assert!(s.events().is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Tick(TickInput, f32),
        Bump(u32),
        Spawn,
    }

    fn op() -> impl Strategy<Value = Op> {
        let input = any::<[bool; 8]>().prop_map(|b| TickInput {
            move_left: b[0],
            move_right: b[1],
            start: b[2],
            pause: b[3],
            resume: b[4],
            restart: b[5],
            quit: b[6],
            idle_mode: b[7],
        });
        prop_oneof![
            4 => (input, -0.05f32..0.3).prop_map(|(i, dt)| Op::Tick(i, dt)),
            1 => (1u32..1_500).prop_map(Op::Bump),
            1 => Just(Op::Spawn),
        ]
    }

    proptest! {
        #[test]
        fn prop_reset_is_idempotent(seed in any::<u64>(), ops in prop::collection::vec(op(), 0..200)) {
            let mut s = Session::new(seed, Tuning::default());
            for op in ops {
                match op {
                    Op::Tick(input, dt) => tick(&mut s, &input, dt),
                    Op::Bump(points) => {
                        s.score = s.score.saturating_add(points);
                        for escalation in s.escalator.on_score_changed(s.score) {
                            if let crate::sim::Escalation::Band { lower, upper, .. } = escalation {
                                s.meter.set_band(lower, upper);
                            }
                        }
                    }
                    Op::Spawn => {
                        s.pool.spawn(PLAYFIELD_WIDTH, FALL_SPEED);
                    }
                }
            }

            s.reset();
            let once = reset_view(&s);
            s.reset();
            prop_assert_eq!(&once, &reset_view(&s));

            let mut fresh = Session::new(seed, Tuning::default());
            tick(&mut fresh, &TickInput { start: true, ..Default::default() }, 1.0 / 60.0);
            prop_assert_eq!(once, reset_view(&fresh));
        }
    }
}
