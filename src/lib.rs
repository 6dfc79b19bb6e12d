//! Ghrong - A side-scrolling zombie runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, collisions, environment phases)
//! - `audio`: Audio cue boundary (the core never plays sound itself)
//! - `platform`: Browser bindings for the JS renderer/audio host
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use audio::{AudioCue, AudioError, AudioMix, AudioSink, LogAudio, dispatch_cues};
pub use tuning::{ConfigError, Tuning};

/// Fixed geometry constants (sprite sizes and hitboxes, in pixels).
///
/// Vertical values are measured upward from the ground baseline.
pub mod consts {
    /// Player hitbox offset from the player's left edge
    pub const PLAYER_HITBOX_INSET: f32 = 10.0;
    pub const PLAYER_HITBOX_WIDTH: f32 = 40.0;
    pub const PLAYER_HITBOX_HEIGHT: f32 = 56.0;
    /// Player box bottom while grounded
    pub const PLAYER_GROUND_Y: f32 = 124.0;
    /// Player box bottom while jumping
    pub const PLAYER_JUMP_Y: f32 = 210.0;

    /// Obstacle (zombie) hitbox is a narrow strip in the middle of the sprite
    pub const OBSTACLE_HITBOX_INSET: f32 = 14.0;
    pub const OBSTACLE_HITBOX_WIDTH: f32 = 11.0;
    pub const OBSTACLE_HITBOX_HEIGHT: f32 = 56.0;
    pub const OBSTACLE_GROUND_Y: f32 = 128.0;
    /// Rendered sprite size
    pub const OBSTACLE_SPRITE_WIDTH: f32 = 48.0;
    pub const OBSTACLE_SPRITE_HEIGHT: f32 = 56.0;

    /// Score at which the progress bar is full
    pub const PROGRESS_FULL_SCORE: u32 = 10_000;
}
