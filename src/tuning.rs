//! Data-driven game balance
//!
//! Every timing, speed and threshold the simulation uses lives here so a host
//! can ship a JSON override without rebuilding the core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error loading or validating a tuning file
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON could not be parsed
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "failed to parse tuning: {e}"),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid tuning value for `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Frame clock ===
    /// Reference frame duration (60 Hz)
    pub frame_duration_ms: f64,
    /// Upper clamp for the normalized delta
    pub max_delta: f32,

    // === Player ===
    /// Fixed player position as a percentage of viewport width
    pub player_x_percent: f32,
    pub jump_duration_ms: f64,
    /// Re-issue cadence while the jump input is held
    pub jump_repeat_ms: f64,
    pub run_frame_ms: f64,
    pub run_frame_count: u8,

    // === Obstacles ===
    /// Speed at score 0 (pixels per normalized frame)
    pub base_speed: f32,
    /// Speed added for every `speed_step_score` points
    pub speed_step: f32,
    pub speed_step_score: u32,
    /// Speed published right after a reset, before the first tick recomputes it
    pub start_boost_speed: f32,
    /// Spawn when the rightmost obstacle is further left than `width - spawn_window`
    pub spawn_window: f32,
    pub spacing_min: f32,
    pub spacing_max: f32,
    /// Obstacles left of this x are destroyed
    pub prune_x: f32,
    pub points_per_crossing: u32,
    pub obstacle_frame_ms: f64,
    pub obstacle_frame_count: u8,

    // === Session ===
    /// Delay between the collision and the game-over screen
    pub game_over_reveal_ms: f64,

    // === Environment ===
    pub lightning_interval_ms: f64,
    /// Duration of each lit flash phase (1 then 2)
    pub lightning_phase_ms: f64,
    pub flash_overlay_ms: f64,
    pub rain_cadence_ms: f64,
    pub snow_cadence_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            frame_duration_ms: 16.67,
            max_delta: 2.0,

            player_x_percent: 5.0,
            jump_duration_ms: 400.0,
            jump_repeat_ms: 500.0,
            run_frame_ms: 150.0,
            run_frame_count: 4,

            base_speed: 4.0,
            speed_step: 0.5,
            speed_step_score: 600,
            start_boost_speed: 8.0,
            spawn_window: 300.0,
            spacing_min: 300.0,
            spacing_max: 800.0,
            prune_x: -100.0,
            points_per_crossing: 20,
            obstacle_frame_ms: 150.0,
            obstacle_frame_count: 5,

            game_over_reveal_ms: 1000.0,

            lightning_interval_ms: 2000.0,
            lightning_phase_ms: 150.0,
            flash_overlay_ms: 100.0,
            rain_cadence_ms: 60.0,
            snow_cadence_ms: 150.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning override");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value keeps the simulation invariants intact
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and > 0",
                })
            }
        }

        positive("frame_duration_ms", self.frame_duration_ms)?;
        positive("max_delta", self.max_delta as f64)?;
        positive("jump_duration_ms", self.jump_duration_ms)?;
        positive("jump_repeat_ms", self.jump_repeat_ms)?;
        positive("run_frame_ms", self.run_frame_ms)?;
        positive("base_speed", self.base_speed as f64)?;
        positive("start_boost_speed", self.start_boost_speed as f64)?;
        positive("spawn_window", self.spawn_window as f64)?;
        positive("spacing_min", self.spacing_min as f64)?;
        positive("obstacle_frame_ms", self.obstacle_frame_ms)?;
        positive("game_over_reveal_ms", self.game_over_reveal_ms)?;
        positive("lightning_interval_ms", self.lightning_interval_ms)?;
        positive("lightning_phase_ms", self.lightning_phase_ms)?;
        positive("flash_overlay_ms", self.flash_overlay_ms)?;
        positive("rain_cadence_ms", self.rain_cadence_ms)?;
        positive("snow_cadence_ms", self.snow_cadence_ms)?;

        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "speed_step",
                reason: "must be finite and >= 0",
            });
        }
        if self.speed_step_score == 0 {
            return Err(ConfigError::Invalid {
                field: "speed_step_score",
                reason: "must be > 0",
            });
        }
        if !(self.spacing_max.is_finite() && self.spacing_max > self.spacing_min) {
            return Err(ConfigError::Invalid {
                field: "spacing_max",
                reason: "must be greater than spacing_min",
            });
        }
        if !(0.0..=100.0).contains(&self.player_x_percent) {
            return Err(ConfigError::Invalid {
                field: "player_x_percent",
                reason: "must be within 0..=100",
            });
        }
        if !self.prune_x.is_finite() || self.prune_x >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "prune_x",
                reason: "must be a finite negative position",
            });
        }
        if self.run_frame_count == 0 || self.obstacle_frame_count == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_count",
                reason: "animation loops need at least one frame",
            });
        }
        Ok(())
    }

    /// Steady-state obstacle speed for a score
    pub fn speed_for_score(&self, score: u32) -> f32 {
        self.base_speed + (score / self.speed_step_score) as f32 * self.speed_step
    }
}
