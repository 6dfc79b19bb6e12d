//! Score-driven environment phases (day, storm, night, snow)
//!
//! `Scenery::for_score` is a pure function of the score. The only time-based
//! part is the lightning strike sequence, whose timer handle is owned by
//! `EnvironmentMachine`, created on window entry and dropped on window exit or
//! reset. Rain and snow are plain latches so their start/stop events fire once
//! per window crossing.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::consts::PROGRESS_FULL_SCORE;
use crate::tuning::Tuning;

/// Points per ground/background tier
pub const TIER_SCORE: u32 = 500;
pub const MAX_TIER: u8 = 7;
/// Ground switches to snow at this score regardless of tier
pub const SNOW_GROUND_SCORE: u32 = 5500;
/// Obstacles switch to their red skin at this score
pub const ENRAGED_SCORE: u32 = 1500;

/// Sun is visible up to and including this score
pub const SUN_SET_SCORE: u32 = 2000;
pub const MOON_RISE_SCORE: u32 = 3000;
pub const MOON_FADE_END_SCORE: u32 = 3500;
pub const MOON_DESCENT_START_SCORE: u32 = 4000;
pub const MOON_DESCENT_SCORE_SPAN: u32 = 1000;
/// How far the sun/moon sink over their descent
pub const CELESTIAL_DROP: f32 = 100.0;

/// Lightning window, inclusive on both ends
pub const LIGHTNING_START_SCORE: u32 = 2500;
pub const LIGHTNING_END_SCORE: u32 = 3500;
/// Rain window, `[start, end)`
pub const RAIN_START_SCORE: u32 = 3000;
pub const RAIN_END_SCORE: u32 = 4500;
pub const SNOW_START_SCORE: u32 = 5000;

/// Horizontal range (percent of viewport width) for lightning bolts
const BOLT_X_RANGE: std::ops::Range<f32> = 10.0..80.0;
/// Bolt position published while no strike is live
const IDLE_BOLT_X: f32 = 50.0;

/// Everything that follows directly from the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    /// 0..=7, progressively darker/stormier
    pub ground_tier: u8,
    pub background_tier: u8,
    /// Snow ground overrides `ground_tier`
    pub snow_ground: bool,
    /// Sun height in pixels (viewport height when high), `None` once set
    pub sun_height: Option<f32>,
    /// Moon height in pixels (viewport height while hidden high), `None` before moonrise
    pub moon_height: Option<f32>,
    pub moon_opacity: f32,
    pub lightning_window: bool,
    pub rain_window: bool,
    pub snow_window: bool,
    /// Red zombie skin
    pub enraged_obstacles: bool,
    /// Progress bar fill, 0..=100
    pub progress_percent: f32,
}

impl Scenery {
    pub fn for_score(score: u32, viewport_height: f32) -> Self {
        let tier = (score / TIER_SCORE).min(MAX_TIER as u32) as u8;

        let sun_height = (score <= SUN_SET_SCORE).then(|| {
            let progress = score as f32 / SUN_SET_SCORE as f32;
            viewport_height - progress * CELESTIAL_DROP
        });

        let moon_height = (score >= MOON_RISE_SCORE).then(|| {
            if score <= MOON_DESCENT_START_SCORE {
                viewport_height
            } else {
                let progress = ((score - MOON_DESCENT_START_SCORE) as f32
                    / MOON_DESCENT_SCORE_SPAN as f32)
                    .min(1.0);
                viewport_height - progress * CELESTIAL_DROP
            }
        });

        let moon_opacity = if score < MOON_RISE_SCORE {
            0.0
        } else if score < MOON_FADE_END_SCORE {
            (score - MOON_RISE_SCORE) as f32 / (MOON_FADE_END_SCORE - MOON_RISE_SCORE) as f32
        } else {
            1.0
        };

        Self {
            ground_tier: tier,
            background_tier: tier,
            snow_ground: score >= SNOW_GROUND_SCORE,
            sun_height,
            moon_height,
            moon_opacity,
            lightning_window: (LIGHTNING_START_SCORE..=LIGHTNING_END_SCORE).contains(&score),
            rain_window: (RAIN_START_SCORE..RAIN_END_SCORE).contains(&score),
            snow_window: score >= SNOW_START_SCORE,
            enraged_obstacles: score >= ENRAGED_SCORE,
            progress_percent: (score as f32 / PROGRESS_FULL_SCORE as f32 * 100.0).min(100.0),
        }
    }
}

/// Published environment for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    #[serde(flatten)]
    pub scenery: Scenery,
    /// 0 = dark, 1 = bright bolt, 2 = fading bolt
    pub lightning_phase: u8,
    /// Bolt position, percent of viewport width
    pub lightning_x_percent: f32,
    /// Full-screen white flash
    pub flash_overlay: bool,
    pub rain_active: bool,
    /// Particle spawn cadence for the renderer
    pub rain_cadence_ms: f64,
    pub snow_active: bool,
    pub snow_cadence_ms: f64,
}

impl EnvironmentState {
    /// Environment with every timed effect off (not started / reset)
    pub fn idle(score: u32, viewport_height: f32, tuning: &Tuning) -> Self {
        Self {
            scenery: Scenery::for_score(score, viewport_height),
            lightning_phase: 0,
            lightning_x_percent: IDLE_BOLT_X,
            flash_overlay: false,
            rain_active: false,
            rain_cadence_ms: tuning.rain_cadence_ms,
            snow_active: false,
            snow_cadence_ms: tuning.snow_cadence_ms,
        }
    }
}

/// Live lightning timer handle
#[derive(Debug, Clone, Copy, PartialEq)]
struct LightningTimer {
    strike_at: f64,
    next_strike_at: f64,
}

impl LightningTimer {
    fn phase(&self, now_ms: f64, phase_ms: f64) -> u8 {
        let elapsed = now_ms - self.strike_at;
        if elapsed < phase_ms {
            1
        } else if elapsed < phase_ms * 2.0 {
            2
        } else {
            0
        }
    }
}

/// Owns the timed effect handles (lightning timer, rain/snow latches)
#[derive(Debug, Clone)]
pub struct EnvironmentMachine {
    lightning: Option<LightningTimer>,
    rain_active: bool,
    snow_active: bool,
    last_bolt_x: f32,
    rng: Pcg32,
}

impl EnvironmentMachine {
    pub fn new(seed: u64) -> Self {
        Self {
            lightning: None,
            rain_active: false,
            snow_active: false,
            last_bolt_x: IDLE_BOLT_X,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// True while any timed effect is live
    pub fn has_active_effects(&self) -> bool {
        self.lightning.is_some() || self.rain_active || self.snow_active
    }

    /// Recompute the environment for this tick
    ///
    /// When `running` is false every timed effect is cancelled.
    pub fn update(
        &mut self,
        score: u32,
        now_ms: f64,
        running: bool,
        viewport_height: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> EnvironmentState {
        let scenery = Scenery::for_score(score, viewport_height);

        if !running {
            self.cancel(events);
        } else {
            self.update_lightning(scenery.lightning_window, now_ms, tuning, events);

            if scenery.rain_window != self.rain_active {
                self.rain_active = scenery.rain_window;
                if self.rain_active {
                    log::info!("Rain started at score {}", score);
                    events.push(GameEvent::RainStarted);
                } else {
                    log::info!("Rain stopped at score {}", score);
                    events.push(GameEvent::RainStopped);
                }
            }

            if scenery.snow_window != self.snow_active {
                self.snow_active = scenery.snow_window;
                if self.snow_active {
                    log::info!("Snow started at score {}", score);
                    events.push(GameEvent::SnowStarted);
                } else {
                    events.push(GameEvent::SnowStopped);
                }
            }
        }

        let (lightning_phase, flash_overlay) = match &self.lightning {
            Some(timer) => (
                timer.phase(now_ms, tuning.lightning_phase_ms),
                now_ms - timer.strike_at < tuning.flash_overlay_ms,
            ),
            None => (0, false),
        };

        EnvironmentState {
            scenery,
            lightning_phase,
            lightning_x_percent: self.last_bolt_x,
            flash_overlay,
            rain_active: self.rain_active,
            rain_cadence_ms: tuning.rain_cadence_ms,
            snow_active: self.snow_active,
            snow_cadence_ms: tuning.snow_cadence_ms,
        }
    }

    fn update_lightning(
        &mut self,
        in_window: bool,
        now_ms: f64,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if !in_window {
            if self.clear_lightning() {
                log::info!("Storm window left, lightning cancelled");
            }
            return;
        }

        let current = self.lightning;
        match current {
            None => {
                log::info!("Storm window entered");
                self.strike(now_ms, now_ms + tuning.lightning_interval_ms, events);
            }
            Some(timer) if now_ms >= timer.next_strike_at => {
                let mut next = timer.next_strike_at;
                while next <= now_ms {
                    next += tuning.lightning_interval_ms;
                }
                self.strike(now_ms, next, events);
            }
            Some(_) => {}
        }
    }

    fn strike(&mut self, now_ms: f64, next_strike_at: f64, events: &mut Vec<GameEvent>) {
        let x_percent = self.rng.random_range(BOLT_X_RANGE);
        self.last_bolt_x = x_percent;
        self.lightning = Some(LightningTimer {
            strike_at: now_ms,
            next_strike_at,
        });
        events.push(GameEvent::Thunder { x_percent });
    }

    /// Drop every timer handle and latch, emitting stop events for live effects
    pub fn cancel(&mut self, events: &mut Vec<GameEvent>) {
        self.clear_lightning();
        if self.rain_active {
            self.rain_active = false;
            events.push(GameEvent::RainStopped);
        }
        if self.snow_active {
            self.snow_active = false;
            events.push(GameEvent::SnowStopped);
        }
    }

    /// Drop the lightning handle; true if one was live
    fn clear_lightning(&mut self) -> bool {
        self.last_bolt_x = IDLE_BOLT_X;
        self.lightning.take().is_some()
    }
}
