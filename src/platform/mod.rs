//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (host timestamps are passed into the core, never read by it)
//! - Input edges (keyboard/touch listeners live in the JS host)
//! - Audio cue delivery
//!
//! Native builds drive `GameSession` directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Key code that acts as the jump button
pub const JUMP_KEY: &str = "Space";

/// Is this `KeyboardEvent.code` the jump key?
pub fn is_jump_key(code: &str) -> bool {
    code == JUMP_KEY
}
