//! Ghrong entry point
//!
//! The browser build is driven by the JS host through `platform::web`. The
//! native binary runs a headless autopilot session at a simulated 60 Hz, which
//! is handy for balance checks:
//!
//! ```text
//! ghrong [seed] [seconds]
//! GHRONG_TUNING=tuning.json ghrong 42 300
//! ```

#[cfg(not(target_arch = "wasm32"))]
use ghrong::{
    AudioMix, LogAudio, Tuning, dispatch_cues,
    sim::{FrameInput, GamePhase, GameSession, Viewport, tick},
};

#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Frames of lead before an obstacle reaches the player's hitbox
#[cfg(not(target_arch = "wasm32"))]
const AUTOPILOT_LEAD_FRAMES: f32 = 5.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 1,
    };
    let seconds: f64 = match args.next() {
        Some(s) => s.parse()?,
        None => 120.0,
    };

    let tuning = match std::env::var("GHRONG_TUNING") {
        Ok(path) => Tuning::from_json(&std::fs::read_to_string(&path)?)?,
        Err(_) => Tuning::default(),
    };

    log::info!("Ghrong (native) headless run: seed={} seconds={}", seed, seconds);
    let score = run_autopilot(seed, seconds, tuning);
    println!("Final score: {score}");
    Ok(())
}

/// Play a session with a simple look-ahead jumper; returns the final score
#[cfg(not(target_arch = "wasm32"))]
fn run_autopilot(seed: u64, seconds: f64, tuning: Tuning) -> u32 {
    use ghrong::consts::*;

    let viewport = Viewport::new(1280.0, 720.0);
    let mut session = GameSession::new(seed, tuning, viewport, 0.0);
    let mut audio = LogAudio::default();
    let mix = AudioMix::default();

    session.tap(0.0);
    let mut now = 0.0;
    while now < seconds * 1000.0 {
        now += FRAME_MS;
        tick(&mut session, &FrameInput { now_ms: now, viewport });

        if session.phase() == GamePhase::Running {
            let player_right = session.player_x() + PLAYER_HITBOX_INSET + PLAYER_HITBOX_WIDTH;
            let lead = session.speed() * AUTOPILOT_LEAD_FRAMES;
            let incoming = session.field().obstacles().iter().any(|o| {
                let gap = o.x + OBSTACLE_HITBOX_INSET - player_right;
                gap > 0.0 && gap <= lead
            });
            if incoming {
                session.tap(now);
            }
        }

        let events = session.drain_events();
        dispatch_cues(&mut audio, &mix, &events);

        if session.game_over_shown() {
            break;
        }
    }

    log::info!(
        "Autopilot finished after {:.1}s: phase={:?} score={} ticks={} obstacles={}/{} cleared cues={}",
        now / 1000.0,
        session.phase(),
        session.score(),
        session.time_ticks(),
        session.obstacles_cleared(),
        session.obstacles_spawned(),
        audio.played
    );
    session.score()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `platform::web::WebGame`, this is just to satisfy the compiler
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_autopilot_scores() {
        // Obstacles need ~5s to reach the player; 30s is plenty to score
        let score = run_autopilot(7, 30.0, Tuning::default());
        assert!(score >= 20, "autopilot should clear at least one obstacle");
        assert_eq!(score % 20, 0);
    }
}
