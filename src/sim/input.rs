//! Jump input handling
//!
//! Turns raw press/release/tap edges into discrete jump commands. Holding the
//! jump input re-issues a jump on a fixed cadence; the cadence is advanced by
//! the same frame timestamps as the simulation, so it is fully deterministic.

use serde::{Deserialize, Serialize};

/// A raw input edge delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEdge {
    /// Key went from released to pressed
    Press,
    /// Key went from pressed to released
    Release,
    /// Click/touch: a single press with no repeat
    Tap,
}

/// What the session allows right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpGate {
    /// Session is not over
    pub active: bool,
    /// Player is mid-jump
    pub jumping: bool,
}

impl JumpGate {
    pub fn ready(&self) -> bool {
        self.active && !self.jumping
    }
}

/// Hold-to-repeat state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RepeatState {
    /// Input released
    Idle,
    /// Held, waiting for the first repeat beat
    Armed { next_at: f64 },
    /// Held, at least one repeat beat has elapsed
    Repeating { next_at: f64 },
}

#[derive(Debug, Clone)]
pub struct InputController {
    state: RepeatState,
    cadence_ms: f64,
}

impl InputController {
    pub fn new(cadence_ms: f64) -> Self {
        Self {
            state: RepeatState::Idle,
            cadence_ms,
        }
    }

    pub fn state(&self) -> RepeatState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        !matches!(self.state, RepeatState::Idle)
    }

    /// Feed one edge; returns true when a jump command is issued
    pub fn on_edge(&mut self, edge: InputEdge, now_ms: f64, gate: JumpGate) -> bool {
        match edge {
            InputEdge::Press => {
                if self.is_held() {
                    // OS key auto-repeat, not a new edge
                    return false;
                }
                self.state = RepeatState::Armed {
                    next_at: now_ms + self.cadence_ms,
                };
                gate.ready()
            }
            InputEdge::Release => {
                self.state = RepeatState::Idle;
                false
            }
            InputEdge::Tap => gate.ready(),
        }
    }

    /// Advance the repeat cadence to `now_ms`; returns true when a held
    /// input re-issues a jump
    ///
    /// A beat that lands mid-jump is skipped, and several missed beats (long
    /// frame gap) collapse into at most one jump.
    pub fn poll(&mut self, now_ms: f64, gate: JumpGate) -> bool {
        let next_at = match self.state {
            RepeatState::Idle => return false,
            RepeatState::Armed { next_at } | RepeatState::Repeating { next_at } => next_at,
        };

        if !gate.active {
            self.cancel();
            return false;
        }
        if now_ms < next_at {
            return false;
        }

        let mut next = next_at;
        while next <= now_ms {
            next += self.cadence_ms;
        }
        self.state = RepeatState::Repeating { next_at: next };
        !gate.jumping
    }

    /// Drop any pending repeat (game over / reset)
    pub fn cancel(&mut self) {
        self.state = RepeatState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal stand-in for the player's jump timer
    struct Jumper {
        started: Option<f64>,
        duration: f64,
        jumps: Vec<f64>,
    }

    impl Jumper {
        fn new(duration: f64) -> Self {
            Self {
                started: None,
                duration,
                jumps: Vec::new(),
            }
        }

        fn gate(&self, now: f64) -> JumpGate {
            JumpGate {
                active: true,
                jumping: self.started.is_some_and(|s| now < s + self.duration),
            }
        }

        fn jump(&mut self, now: f64) {
            assert!(!self.gate(now).jumping, "jumps must never overlap");
            self.started = Some(now);
            self.jumps.push(now);
        }
    }

    fn hold(duration_ms: f64, jump_ms: f64, cadence_ms: f64, frame_ms: f64) -> Vec<f64> {
        let mut input = InputController::new(cadence_ms);
        let mut jumper = Jumper::new(jump_ms);

        if input.on_edge(InputEdge::Press, 0.0, jumper.gate(0.0)) {
            jumper.jump(0.0);
        }
        let mut now = frame_ms;
        while now < duration_ms {
            if input.poll(now, jumper.gate(now)) {
                jumper.jump(now);
            }
            now += frame_ms;
        }
        input.on_edge(InputEdge::Release, duration_ms, jumper.gate(duration_ms));
        jumper.jumps
    }

    #[test]
    fn test_hold_repeats_on_cadence() {
        let jumps = hold(2000.0, 400.0, 500.0, 10.0);
        assert_eq!(jumps, vec![0.0, 500.0, 1000.0, 1500.0]);
    }

    #[test]
    fn test_hold_at_display_rate_is_approximate() {
        let jumps = hold(2000.0, 400.0, 500.0, 1000.0 / 60.0);
        assert_eq!(jumps.len(), 4);
        for (jump, expected) in jumps.iter().zip([0.0, 500.0, 1000.0, 1500.0]) {
            assert!((jump - expected).abs() < 17.0, "{jump} vs {expected}");
        }
    }

    #[test]
    fn test_beat_during_jump_is_skipped() {
        // Jump outlasts the cadence, so every other beat is dropped
        let jumps = hold(2000.0, 600.0, 500.0, 10.0);
        assert_eq!(jumps, vec![0.0, 1000.0]);
    }

    #[test]
    fn test_release_cancels_cadence() {
        let mut input = InputController::new(500.0);
        let gate = JumpGate {
            active: true,
            jumping: false,
        };
        assert!(input.on_edge(InputEdge::Press, 0.0, gate));
        assert!(!input.on_edge(InputEdge::Release, 200.0, gate));
        assert_eq!(input.state(), RepeatState::Idle);
        assert!(!input.poll(500.0, gate));
        assert!(!input.poll(1000.0, gate));
    }

    #[test]
    fn test_auto_repeat_press_is_not_an_edge() {
        let mut input = InputController::new(500.0);
        let gate = JumpGate {
            active: true,
            jumping: false,
        };
        assert!(input.on_edge(InputEdge::Press, 0.0, gate));
        assert!(!input.on_edge(InputEdge::Press, 30.0, gate));
        assert_eq!(input.state(), RepeatState::Armed { next_at: 500.0 });
    }

    #[test]
    fn test_tap_has_no_cadence() {
        let mut input = InputController::new(500.0);
        let gate = JumpGate {
            active: true,
            jumping: false,
        };
        assert!(input.on_edge(InputEdge::Tap, 0.0, gate));
        assert!(!input.is_held());
        assert!(!input.poll(600.0, gate));
    }

    #[test]
    fn test_rejected_when_over_or_mid_jump() {
        let mut input = InputController::new(500.0);
        let over = JumpGate {
            active: false,
            jumping: false,
        };
        let mid_jump = JumpGate {
            active: true,
            jumping: true,
        };
        assert!(!input.on_edge(InputEdge::Tap, 0.0, over));
        assert!(!input.on_edge(InputEdge::Tap, 0.0, mid_jump));
        // Press still arms the cadence even though the first jump was dropped
        assert!(!input.on_edge(InputEdge::Press, 0.0, mid_jump));
        assert!(input.is_held());
    }

    #[test]
    fn test_inactive_session_cancels_repeat() {
        let mut input = InputController::new(500.0);
        let gate = JumpGate {
            active: true,
            jumping: false,
        };
        input.on_edge(InputEdge::Press, 0.0, gate);
        let over = JumpGate {
            active: false,
            jumping: false,
        };
        assert!(!input.poll(500.0, over));
        assert_eq!(input.state(), RepeatState::Idle);
    }

    #[test]
    fn test_long_gap_collapses_beats() {
        let mut input = InputController::new(500.0);
        let gate = JumpGate {
            active: true,
            jumping: false,
        };
        input.on_edge(InputEdge::Press, 0.0, gate);
        assert!(input.poll(1700.0, gate));
        assert_eq!(input.state(), RepeatState::Repeating { next_at: 2000.0 });
        assert!(!input.poll(1800.0, gate));
    }
}
