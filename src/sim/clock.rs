//! Frame clock
//!
//! Converts display timestamps into a unit-normalized delta (1.0 == one 60 Hz
//! frame). The delta is clamped so a suspended tab can't teleport obstacles
//! past the player in a single frame.

/// Normalized-delta clock driven by frame timestamps (milliseconds)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: f64,
    frame_duration_ms: f64,
    max_delta: f32,
}

impl FrameClock {
    pub fn new(now_ms: f64, frame_duration_ms: f64, max_delta: f32) -> Self {
        Self {
            last_ms: now_ms,
            frame_duration_ms,
            max_delta,
        }
    }

    /// Advance to `now_ms`, returning the delta in reference frames
    ///
    /// The baseline always moves to `now_ms`, even on the frame that ends the run.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let raw = ((now_ms - self.last_ms) / self.frame_duration_ms) as f32;
        self.last_ms = now_ms;
        if raw > self.max_delta {
            log::debug!("Clamping frame delta {:.2} -> {}", raw, self.max_delta);
        }
        // NaN (bad timestamp) falls through `clamp` unchanged, so map it to 0
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, self.max_delta)
    }

    /// Restart from a fresh baseline (session start/reset)
    pub fn rebase(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
    }

    pub fn last_ms(&self) -> f64 {
        self.last_ms
    }
}
