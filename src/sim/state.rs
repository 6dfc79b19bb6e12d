//! Game state and core simulation types
//!
//! `GameSession` owns all mutable state for one run. Everything the renderer
//! needs is published through `FrameSnapshot`, a read-only copy.

use serde::{Deserialize, Serialize};

use super::clock::FrameClock;
use super::environment::{EnvironmentMachine, EnvironmentState};
use super::input::{InputController, JumpGate};
use super::obstacle::{ObstacleField, ObstacleId};
use crate::tuning::Tuning;

/// Mixed into the session seed for the environment RNG so bolts and
/// obstacle spacing don't share a stream
const ENVIRONMENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first jump
    NotStarted,
    /// Active gameplay
    Running,
    /// Player was hit; only a reset is accepted
    GameOver,
}

/// Viewport size supplied by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The runner. The world scrolls; the player only jumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Fixed horizontal position, percent of viewport width
    pub x_percent: f32,
    pub is_jumping: bool,
    pub jump_started_at: Option<f64>,
    /// Run-cycle frame (frozen while jumping)
    pub run_frame: u8,
    pub run_frame_at: f64,
}

impl PlayerState {
    pub fn new(x_percent: f32, now_ms: f64) -> Self {
        Self {
            x_percent,
            is_jumping: false,
            jump_started_at: None,
            run_frame: 0,
            run_frame_at: now_ms,
        }
    }

    /// Horizontal position in pixels
    pub fn pixel_x(&self, viewport_width: f32) -> f32 {
        self.x_percent / 100.0 * viewport_width
    }

    pub fn start_jump(&mut self, now_ms: f64) {
        self.is_jumping = true;
        self.jump_started_at = Some(now_ms);
    }

    /// End the jump after its fixed duration and advance the run cycle
    pub fn update(&mut self, now_ms: f64, tuning: &Tuning) {
        if self.is_jumping {
            let started = self.jump_started_at.unwrap_or(now_ms);
            if now_ms - started >= tuning.jump_duration_ms {
                self.is_jumping = false;
            }
        }

        if !self.is_jumping && now_ms - self.run_frame_at >= tuning.run_frame_ms {
            self.run_frame = (self.run_frame + 1) % tuning.run_frame_count;
            self.run_frame_at = now_ms;
        }
    }

    /// Frame the renderer should draw
    pub fn display_frame(&self) -> u8 {
        if self.is_jumping { 0 } else { self.run_frame }
    }
}

/// Score and lifecycle flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Authoritative score; all thresholds read this
    pub score: u32,
    /// Scoreboard mirror, fed by the same award events
    pub display_score: u32,
    pub game_started: bool,
    pub game_over: bool,
}

impl SessionState {
    /// Apply one award to both counters at once
    pub fn award(&mut self, points: u32) {
        self.score += points;
        self.display_score += points;
    }
}

/// Discrete events for collaborators (audio, analytics, HUD pops)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// First jump of the run; begin background ambiance
    Started,
    Jumped,
    Scored { obstacle: ObstacleId, points: u32 },
    Collided { obstacle: ObstacleId, score: u32 },
    Thunder { x_percent: f32 },
    RainStarted,
    RainStopped,
    SnowStarted,
    SnowStopped,
    /// Game-over screen may be shown
    GameOverShown,
    Reset,
}

/// Obstacle as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub x: f32,
    pub frame: u8,
}

/// Read-only copy of everything the renderer draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub session: SessionState,
    pub player: PlayerState,
    /// Player position in pixels
    pub player_x: f32,
    pub player_frame: u8,
    pub obstacles: Vec<ObstacleView>,
    pub environment: EnvironmentState,
    pub speed: f32,
    pub game_over_shown: bool,
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(super) tuning: Tuning,
    pub(super) seed: u64,
    /// Number of resets so far (varies the RNG between runs)
    pub(super) resets: u64,
    pub(super) phase: GamePhase,
    pub(super) session: SessionState,
    pub(super) player: PlayerState,
    pub(super) clock: FrameClock,
    pub(super) input: InputController,
    pub(super) field: ObstacleField,
    pub(super) environment: EnvironmentMachine,
    pub(super) env_state: EnvironmentState,
    /// Published scroll speed
    pub(super) speed: f32,
    pub(super) viewport: Viewport,
    pub(super) game_over_at: Option<f64>,
    pub(super) game_over_shown: bool,
    /// Simulation ticks run this session
    pub(super) time_ticks: u64,
    /// Obstacles spawned / scrolled off-screen this session
    pub(super) obstacles_spawned: u32,
    pub(super) obstacles_cleared: u32,
    pub(super) events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a session waiting for its first jump
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport, now_ms: f64) -> Self {
        Self {
            seed,
            resets: 0,
            phase: GamePhase::NotStarted,
            session: SessionState::default(),
            player: PlayerState::new(tuning.player_x_percent, now_ms),
            clock: FrameClock::new(now_ms, tuning.frame_duration_ms, tuning.max_delta),
            input: InputController::new(tuning.jump_repeat_ms),
            field: ObstacleField::new(seed),
            environment: EnvironmentMachine::new(seed ^ ENVIRONMENT_SEED_SALT),
            env_state: EnvironmentState::idle(0, viewport.height, &tuning),
            speed: tuning.start_boost_speed,
            viewport,
            game_over_at: None,
            game_over_shown: false,
            time_ticks: 0,
            obstacles_spawned: 0,
            obstacles_cleared: 0,
            events: Vec::new(),
            tuning,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.env_state
    }

    pub fn environment_machine(&self) -> &EnvironmentMachine {
        &self.environment
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn obstacles_spawned(&self) -> u32 {
        self.obstacles_spawned
    }

    pub fn obstacles_cleared(&self) -> u32 {
        self.obstacles_cleared
    }

    pub fn game_over_shown(&self) -> bool {
        self.game_over_shown
    }

    pub fn input_held(&self) -> bool {
        self.input.is_held()
    }

    /// Player position in pixels for the current viewport
    pub fn player_x(&self) -> f32 {
        self.player.pixel_x(self.viewport.width)
    }

    pub(super) fn jump_gate(&self) -> JumpGate {
        JumpGate {
            active: self.phase != GamePhase::GameOver,
            jumping: self.player.is_jumping,
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Copy out everything the renderer needs
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            session: self.session,
            player: self.player,
            player_x: self.player_x(),
            player_frame: self.player.display_frame(),
            obstacles: self
                .field
                .obstacles()
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    x: o.x,
                    frame: o.frame,
                })
                .collect(),
            environment: self.env_state,
            speed: self.speed,
            game_over_shown: self.game_over_shown,
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Seeds for the current run (reset count mixed in)
    pub(super) fn run_seeds(&self) -> (u64, u64) {
        let seed = self.seed.wrapping_add(self.resets);
        (seed, seed ^ ENVIRONMENT_SEED_SALT)
    }
}
