//! Per-frame session update
//!
//! One call advances the state machine and, while playing, runs the whole
//! gameplay pipeline for the frame's delta time.

use super::escalation::Escalation;
use super::meter::BandStatus;
use super::objects::FallingObject;
use super::state::{GameOverReason, Phase, Session, SessionEvent};
use crate::sanitize_dt;

/// Horizontal distance the autopilot treats as "close enough"
const AUTOPILOT_DEADZONE: f32 = 4.0;

/// Input intents for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left held (arrow or A)
    pub move_left: bool,
    /// Right held (arrow or D)
    pub move_right: bool,
    /// Start from the intro
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Pause menu: resume
    pub resume: bool,
    /// Pause menu restart, or restart from the end screens
    pub restart: bool,
    /// Pause menu: back to intro
    pub quit: bool,
    /// Idle/demo mode - autopilot drives the catcher
    pub idle_mode: bool,
}

impl TickInput {
    /// Net horizontal direction: -1, 0 or +1
    pub fn direction(&self) -> i8 {
        match (self.move_left, self.move_right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Advance the session by one frame
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    let raw_dt = dt;
    let dt = sanitize_dt(dt, session.tuning().max_frame_dt);
    if raw_dt.is_finite() && raw_dt > dt {
        log::warn!("Frame delta {:.3}s clamped to {:.3}s", raw_dt, dt);
    }

    match session.phase {
        Phase::Intro => {
            if input.start {
                session.reset();
                session.set_phase(Phase::Playing);
                session.emit(SessionEvent::Started);
            }
        }
        Phase::Paused => {
            if input.quit {
                session.reset();
                session.set_phase(Phase::Intro);
                session.emit(SessionEvent::Quit);
            } else if input.restart {
                session.reset();
                session.set_phase(Phase::Playing);
                session.emit(SessionEvent::Restarted);
            } else if input.pause || input.resume {
                session.set_phase(Phase::Playing);
                session.emit(SessionEvent::Resumed);
            }
        }
        Phase::GameOver | Phase::Victory => {
            // Stats stay visible until the next start resets them
            if input.restart {
                session.set_phase(Phase::Intro);
                session.emit(SessionEvent::ReturnedToIntro);
            }
        }
        Phase::Playing => {
            if input.pause {
                session.set_phase(Phase::Paused);
                session.emit(SessionEvent::Paused);
            } else {
                update_playing(session, input, dt);
            }
        }
    }
}

/// The ordered gameplay pipeline for one `Playing` frame
fn update_playing(session: &mut Session, input: &TickInput, dt: f32) {
    let width = session.tuning().playfield_width;
    let height = session.tuning().playfield_height;
    let duration = session.tuning().duration_secs;

    // 1. Countdown
    session.elapsed += dt;
    if session.elapsed >= duration {
        session.elapsed = duration;
        match session.meter.status() {
            BandStatus::InBand => session.win(),
            _ => session.lose(GameOverReason::TimeUp),
        }
        return;
    }

    // 2. Catcher
    let direction = if input.idle_mode {
        autopilot_direction(session)
    } else {
        input.direction()
    };
    let catcher_speed = session.escalator.catcher_speed();
    session.catcher.move_by(direction, catcher_speed, dt);
    session.catcher.clamp(width);

    // 3. Spawning
    session.spawn_timer += dt;
    if session.spawn_timer > session.escalator.spawn_interval() {
        session.spawn_timer = 0.0;
        let object = session.pool.spawn(width, session.escalator.fall_speed());
        log::debug!(
            "Spawned #{} {} at x={:.0}",
            object.id,
            object.category.as_str(),
            object.pos.x
        );
        session.emit(SessionEvent::Spawned {
            id: object.id,
            category: object.category,
        });
    }

    // 4. Fall, then catches before misses so nothing is charged twice
    session.pool.advance(dt);
    let caught = session.pool.check_collisions(&session.catcher.bounds());
    for object in caught {
        collect(session, &object);
    }
    let missed = session.pool.retire_offscreen(height);
    for object in missed {
        let gauge = session.meter.apply_miss();
        log::debug!(
            "Missed #{} {}: gauge {}",
            object.id,
            object.category.as_str(),
            gauge
        );
        session.emit(SessionEvent::Missed {
            id: object.id,
            category: object.category,
        });
    }

    // 5. Desire fades on its own
    if session.meter.apply_decay(dt) {
        let gauge = session.meter.gauge();
        log::debug!("Desire decayed to {}", gauge);
        session.emit(SessionEvent::Decayed { gauge });
    }

    // 6. Escalation
    for escalation in session.escalator.on_score_changed(session.score) {
        match escalation {
            Escalation::Speed { milestone, .. } => {
                session.emit(SessionEvent::SpeedEscalated { milestone });
            }
            Escalation::Band {
                milestone,
                lower,
                upper,
            } => {
                session.meter.set_band(lower, upper);
                session.emit(SessionEvent::BandNarrowed {
                    milestone,
                    lower,
                    upper,
                });
            }
        }
    }
    session.escalator.tick(dt);

    // 7. Breach check
    if let Some(reason) = GameOverReason::from_status(session.meter.status()) {
        session.lose(reason);
    }
}

fn collect(session: &mut Session, object: &FallingObject) {
    let effect = session.tuning().effects.get(object.category);
    session.score = session.score.saturating_add(effect.score);
    let gauge = session.meter.apply_collection(object.category);
    log::debug!(
        "Caught #{} {}: score {}, gauge {}",
        object.id,
        object.category.as_str(),
        session.score,
        gauge
    );
    session.emit(SessionEvent::Caught {
        id: object.id,
        category: object.category,
    });
}

/// Pick a direction for demo play: chase the lowest object whose catch keeps
/// the gauge in band, preferring ones that pull toward the band centre.
fn autopilot_direction(session: &Session) -> i8 {
    let gauge = session.meter.gauge();
    let (lower, upper) = session.meter.band();
    let centre = (lower + upper) / 2;
    let effects = session.tuning().effects;
    let catcher = &session.catcher;

    let keeps_balance = |o: &&FallingObject| {
        let after = gauge.saturating_add(effects.get(o.category).gauge).clamp(0, 100);
        (lower..=upper).contains(&after)
    };
    let toward_centre = |o: &FallingObject| {
        let after = gauge.saturating_add(effects.get(o.category).gauge).clamp(0, 100);
        (after - centre).abs()
    };

    let target = session
        .pool
        .objects()
        .iter()
        .filter(|o| o.pos.y < catcher.y)
        .filter(keeps_balance)
        .min_by(|a, b| {
            // Lowest first (soonest to land), then best for balance
            b.pos
                .y
                .partial_cmp(&a.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| toward_centre(*a).cmp(&toward_centre(*b)))
        })
        .map(|o| o.pos.x)
        .unwrap_or(session.tuning().playfield_width / 2.0);

    let delta = target - catcher.x;
    if delta > AUTOPILOT_DEADZONE {
        1
    } else if delta < -AUTOPILOT_DEADZONE {
        -1
    } else {
        0
    }
}
