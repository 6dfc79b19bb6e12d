//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives as frame/input timestamps from the host
//! - Seeded RNG only
//! - Stable iteration order (spawn order == left-to-right order)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod environment;
pub mod input;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{Aabb, first_hit, obstacle_box, player_box, player_hits_obstacle};
pub use environment::{EnvironmentMachine, EnvironmentState, Scenery};
pub use input::{InputController, InputEdge, JumpGate, RepeatState};
pub use obstacle::{FieldStep, Obstacle, ObstacleField, ObstacleId, StepParams};
pub use state::{
    FrameSnapshot, GameEvent, GamePhase, GameSession, ObstacleView, PlayerState, SessionState,
    Viewport,
};
pub use tick::{FrameInput, tick};
