//! Balance of Desire entry point
//!
//! Headless native runner: plays a session with the autopilot at a fixed
//! frame rate and reports how it ended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use balance_of_desire::Tuning;
use balance_of_desire::sim::{Phase, Session, SessionEvent, TickInput, tick};
use balance_of_desire::ui::IntroSequence;

/// Most simulation steps run for one rendered frame
const MAX_SUBSTEPS: u32 = 16;

#[derive(Debug, Parser)]
#[command(name = "balance-of-desire", about = "Headless Balance of Desire session runner")]
struct Args {
    /// Seed for the falling-object stream (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many frames even if the session is still running
    #[arg(long, default_value_t = 60 * 200)]
    frames: u32,
    /// Simulated frame rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Frames spent on the intro cinematic before starting
    #[arg(long, default_value_t = 0)]
    intro_frames: u32,
    /// JSON file overriding the default balance
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Print the final render snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Game instance holding all state
struct Game {
    session: Session,
    intro: IntroSequence,
    frame: u32,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            session: Session::new(seed, tuning),
            intro: IntroSequence::new(),
            frame: 0,
        }
    }

    /// Run one frame: intro until `intro_frames`, then autopilot play.
    /// Frames longer than the tuning's `max_frame_dt` run as several sub-steps.
    fn update(&mut self, dt: f32, intro_frames: u32) {
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        if self.session.phase == Phase::Intro {
            if self.intro.tick(dt) {
                log::debug!("Intro: {}", self.intro.caption().lines().next().unwrap_or(""));
            }
            input.start = self.frame >= intro_frames;
        }

        let (steps, step_dt) = substeps(dt, self.session.tuning().max_frame_dt);
        for _ in 0..steps {
            tick(&mut self.session, &input, step_dt);
        }
        self.frame += 1;

        for event in self.session.drain_events() {
            match event {
                SessionEvent::Quit | SessionEvent::ReturnedToIntro => self.intro.reset(),
                SessionEvent::SpeedEscalated { milestone } => {
                    log::info!("Frame {}: speed up at {}", self.frame, milestone)
                }
                SessionEvent::BandNarrowed { lower, upper, .. } => {
                    log::info!("Frame {}: band now {}-{}", self.frame, lower, upper)
                }
                other => log::trace!("Frame {}: {:?}", self.frame, other),
            }
        }
    }

    fn finished(&self) -> bool {
        matches!(self.session.phase, Phase::GameOver | Phase::Victory)
    }
}

/// Split a frame into equal steps no longer than `max_dt`
fn substeps(dt: f32, max_dt: f32) -> (u32, f32) {
    if !(dt > max_dt && max_dt > 0.0) {
        return (1, dt);
    }
    let steps = ((dt / max_dt).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    (steps, dt / steps as f32)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let dt = 1.0 / args.fps as f32;

    log::info!("Balance of Desire (native) starting with seed {}", seed);
    let mut game = Game::new(seed, tuning);
    while game.frame < args.frames && !game.finished() {
        game.update(dt, args.intro_frames);
    }

    let snapshot = game.session.snapshot();
    if args.json {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        println!("{json}");
    } else {
        println!("Phase:  {:?}", snapshot.phase);
        println!("Score:  {}", snapshot.score);
        println!(
            "Desire: {}% (safe {}-{})",
            snapshot.gauge, snapshot.band_lower, snapshot.band_upper
        );
        println!("Time:   {} left after {} frames", snapshot.clock, game.frame);
        if let Some(message) = &snapshot.message {
            println!("{message}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substeps_split_long_frames() {
        assert_eq!(substeps(1.0 / 60.0, 0.1), (1, 1.0 / 60.0));
        let (steps, step_dt) = substeps(0.25, 0.1);
        assert_eq!(steps, 3);
        assert!((step_dt - 0.25 / 3.0).abs() < 1e-6);
        let (steps, step_dt) = substeps(1.0, 0.1);
        assert!(steps >= 10);
        assert!(step_dt <= 0.1 + 1e-6);
        assert_eq!(substeps(100.0, 0.1).0, MAX_SUBSTEPS);
    }

    #[test]
    fn test_slow_fps_keeps_real_time() {
        let mut game = Game::new(3, Tuning::default());
        // Three sub-steps: the start consumes the first, the other two play
        game.update(0.25, 0);
        assert_eq!(game.session.phase, Phase::Playing);
        assert!((game.session.elapsed - 0.25 / 3.0 * 2.0).abs() < 1e-4);
        game.update(0.25, 0);
        assert!((game.session.elapsed - 0.25 / 3.0 * 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_returning_to_intro_restarts_cinematic() {
        let dt = 1.0 / 60.0;
        let mut game = Game::new(3, Tuning::default());
        game.update(dt, 0);
        assert_eq!(game.session.phase, Phase::Playing);
        game.intro.tick(2.0);

        game.session.meter.apply_delta(100);
        game.update(dt, 0);
        assert_eq!(game.session.phase, Phase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut game.session, &restart, dt);
        assert_eq!(game.session.phase, Phase::Intro);
        game.update(dt, u32::MAX);
        assert_eq!(game.intro, IntroSequence::new());
    }
}
