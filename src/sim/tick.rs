//! Per-frame simulation tick
//!
//! Pipeline order within one tick is fixed:
//! clock -> obstacles -> collision -> score -> environment.

use super::collision::first_hit;
use super::environment::{EnvironmentMachine, EnvironmentState};
use super::input::InputEdge;
use super::obstacle::{ObstacleId, StepParams};
use super::state::{GameEvent, GamePhase, GameSession, PlayerState, SessionState, Viewport};

/// Host inputs for a single frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Display timestamp (ms)
    pub now_ms: f64,
    pub viewport: Viewport,
}

/// Advance the session by one display frame
pub fn tick(session: &mut GameSession, frame: &FrameInput) {
    session.viewport = frame.viewport;

    match session.phase {
        GamePhase::NotStarted => {}
        GamePhase::GameOver => reveal_game_over(session, frame.now_ms),
        GamePhase::Running => run_pipeline(session, frame.now_ms),
    }
}

fn run_pipeline(s: &mut GameSession, now_ms: f64) {
    let delta = s.clock.tick(now_ms);

    // Jump timing and hold-to-repeat share the frame timestamp
    s.player.update(now_ms, &s.tuning);
    let gate = s.jump_gate();
    if s.input.poll(now_ms, gate) {
        s.jump(now_ms);
    }

    s.speed = s.tuning.speed_for_score(s.session.score);
    let player_x = s.player_x();
    let step = s.field.step(
        &StepParams {
            delta,
            speed: s.speed,
            player_x,
            viewport_width: s.viewport.width,
            now_ms,
        },
        &s.tuning,
    );
    s.obstacles_spawned += step.spawned.is_some() as u32;
    s.obstacles_cleared += step.pruned.len() as u32;

    let obstacles = s.field.obstacles();
    if let Some(hit) = first_hit(player_x, s.player.is_jumping, obstacles.iter().map(|o| o.x)) {
        let obstacle = obstacles[hit].id;
        s.game_over(now_ms, obstacle);
        return;
    }

    for &obstacle in &step.crossings {
        s.events.push(GameEvent::Scored {
            obstacle,
            points: s.tuning.points_per_crossing,
        });
    }
    if step.points > 0 {
        s.session.award(step.points);
    }

    s.env_state = s.environment.update(
        s.session.score,
        now_ms,
        true,
        s.viewport.height,
        &s.tuning,
        &mut s.events,
    );
    s.time_ticks += 1;
}

fn reveal_game_over(s: &mut GameSession, now_ms: f64) {
    if s.game_over_shown {
        return;
    }
    let Some(at) = s.game_over_at else { return };
    if now_ms - at >= s.tuning.game_over_reveal_ms {
        s.game_over_shown = true;
        s.field.clear();
        s.events.push(GameEvent::GameOverShown);
    }
}

impl GameSession {
    /// Deliver a raw input edge from the host
    ///
    /// Jumps requested mid-jump or after game over are dropped silently.
    pub fn handle_input(&mut self, edge: InputEdge, now_ms: f64) {
        self.player.update(now_ms, &self.tuning);
        let gate = self.jump_gate();
        if self.input.on_edge(edge, now_ms, gate) {
            self.jump(now_ms);
        }
    }

    pub fn press(&mut self, now_ms: f64) {
        self.handle_input(InputEdge::Press, now_ms);
    }

    pub fn release(&mut self, now_ms: f64) {
        self.handle_input(InputEdge::Release, now_ms);
    }

    pub fn tap(&mut self, now_ms: f64) {
        self.handle_input(InputEdge::Tap, now_ms);
    }

    fn jump(&mut self, now_ms: f64) {
        debug_assert!(self.jump_gate().ready());
        if self.phase == GamePhase::NotStarted {
            self.start(now_ms);
        }
        self.player.start_jump(now_ms);
        self.events.push(GameEvent::Jumped);
    }

    fn start(&mut self, now_ms: f64) {
        debug_assert!(self.field.is_empty());
        self.phase = GamePhase::Running;
        self.session.game_started = true;
        self.clock.rebase(now_ms);
        self.events.push(GameEvent::Started);
        log::info!("Run started (seed {})", self.run_seeds().0);
    }

    fn game_over(&mut self, now_ms: f64, obstacle: ObstacleId) {
        self.phase = GamePhase::GameOver;
        self.session.game_over = true;
        self.game_over_at = Some(now_ms);
        self.input.cancel();
        self.env_state = self.environment.update(
            self.session.score,
            now_ms,
            false,
            self.viewport.height,
            &self.tuning,
            &mut self.events,
        );
        self.events.push(GameEvent::Collided {
            obstacle,
            score: self.session.score,
        });
        log::info!(
            "Game over: hit obstacle {} with score {} after {} ticks",
            obstacle,
            self.session.score,
            self.time_ticks
        );
    }

    /// Restore the not-started state
    ///
    /// Timers and held input are cancelled before any new state is applied.
    pub fn reset(&mut self, now_ms: f64) {
        self.input.cancel();
        self.environment.cancel(&mut self.events);

        self.resets += 1;
        let (field_seed, env_seed) = self.run_seeds();
        self.field.reseed(field_seed);
        self.environment = EnvironmentMachine::new(env_seed);
        self.env_state = EnvironmentState::idle(0, self.viewport.height, &self.tuning);

        self.phase = GamePhase::NotStarted;
        self.session = SessionState::default();
        self.player = PlayerState::new(self.tuning.player_x_percent, now_ms);
        self.clock.rebase(now_ms);
        self.speed = self.tuning.start_boost_speed;
        self.game_over_at = None;
        self.game_over_shown = false;
        self.time_ticks = 0;
        self.obstacles_spawned = 0;
        self.obstacles_cleared = 0;

        self.events.push(GameEvent::Reset);
        log::info!("Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::Obstacle;
    use crate::tuning::Tuning;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    fn session() -> GameSession {
        GameSession::new(12345, Tuning::default(), viewport(), 0.0)
    }

    fn frame(now_ms: f64) -> FrameInput {
        FrameInput {
            now_ms,
            viewport: viewport(),
        }
    }

    /// Force a crossing on the next tick by planting an obstacle just right of the player
    fn plant_crossing(s: &mut GameSession, id: ObstacleId) {
        let x = s.player_x() + 1.0;
        s.field.obstacles_mut().insert(0, Obstacle::new(id, x, 0.0));
    }

    #[test]
    fn test_not_started_ignores_ticks() {
        let mut s = session();
        tick(&mut s, &frame(100.0));
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert!(s.field().is_empty());
        assert_eq!(s.time_ticks(), 0);
    }

    #[test]
    fn test_first_jump_starts_once() {
        let mut s = session();
        s.tap(10.0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert!(s.session().game_started);
        assert!(s.player().is_jumping);
        assert_eq!(s.drain_events(), vec![GameEvent::Started, GameEvent::Jumped]);

        // Mid-jump tap is dropped
        s.tap(100.0);
        assert!(s.drain_events().is_empty());

        // Later jump doesn't restart the run
        s.tap(500.0);
        assert_eq!(s.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn test_start_boost_is_replaced_on_first_tick() {
        let mut s = session();
        assert_eq!(s.speed(), 8.0);
        s.tap(0.0);
        tick(&mut s, &frame(FRAME_MS));
        assert_eq!(s.speed(), 4.0);
        // First spawn sits at the right edge
        assert_eq!(s.field().obstacles()[0].x, 1000.0);
    }

    #[test]
    fn test_running_ticks_scroll_obstacles() {
        let mut s = session();
        s.tap(0.0);
        tick(&mut s, &frame(FRAME_MS));
        let x0 = s.field().obstacles()[0].x;
        tick(&mut s, &frame(FRAME_MS * 2.0));
        let x1 = s.field().obstacles()[0].x;
        assert!((x0 - x1 - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_spawn_and_clear_counters() {
        let mut s = session();
        s.tap(0.0);
        s.field.obstacles_mut().insert(0, Obstacle::new(800, -98.0, 0.0));
        tick(&mut s, &frame(FRAME_MS));
        assert_eq!(s.obstacles_cleared(), 1);
        // The off-screen obstacle left the field empty, so one spawn follows
        assert_eq!(s.obstacles_spawned(), 1);

        tick(&mut s, &frame(FRAME_MS * 2.0));
        assert_eq!(s.obstacles_spawned(), 1);

        s.reset(100.0);
        assert_eq!(s.obstacles_spawned(), 0);
        assert_eq!(s.obstacles_cleared(), 0);
    }

    #[test]
    fn test_crossing_awards_both_counters() {
        let mut s = session();
        s.tap(0.0);
        // Stay airborne so the planted obstacle can't hit us
        plant_crossing(&mut s, 900);
        tick(&mut s, &frame(FRAME_MS));
        assert_eq!(s.score(), 20);
        assert_eq!(s.session().display_score, 20);
        assert!(
            s.drain_events()
                .contains(&GameEvent::Scored { obstacle: 900, points: 20 })
        );
    }

    #[test]
    fn test_collision_ends_run() {
        let mut s = session();
        s.tap(0.0);
        // Land, then walk into an obstacle
        tick(&mut s, &frame(450.0));
        assert!(!s.player().is_jumping);
        let x = s.player_x();
        s.field.obstacles_mut().insert(0, Obstacle::new(700, x, 0.0));
        tick(&mut s, &frame(450.0 + FRAME_MS));

        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(s.session().game_over);
        assert_eq!(s.score(), 0);
        // The fatal tick still advances the frame baseline
        assert_eq!(s.clock.last_ms(), 450.0 + FRAME_MS);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Collided { obstacle: 700, score: 0 }));

        // No more simulation, and input is rejected
        let ticks = s.time_ticks();
        s.tap(600.0);
        tick(&mut s, &frame(700.0));
        assert_eq!(s.time_ticks(), ticks);
        assert!(!s.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_game_over_reveal_after_delay() {
        let mut s = session();
        s.tap(0.0);
        tick(&mut s, &frame(450.0));
        let x = s.player_x();
        s.field.obstacles_mut().insert(0, Obstacle::new(700, x, 0.0));
        tick(&mut s, &frame(500.0));
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(!s.field().is_empty());

        tick(&mut s, &frame(1400.0));
        assert!(!s.game_over_shown());
        tick(&mut s, &frame(1500.0));
        assert!(s.game_over_shown());
        assert!(s.field().is_empty());
    }

    #[test]
    fn test_reset_after_scoring_and_collision() {
        let mut s = session();
        s.tap(0.0);

        // Five crossings, one per tick, while airborne
        for i in 0..5 {
            plant_crossing(&mut s, 1000 + i);
            tick(&mut s, &frame(FRAME_MS * (i + 1) as f64));
        }
        assert_eq!(s.score(), 100);

        // Score 100 is below every weather window; push it into the storm to
        // make sure reset also tears down live effects
        s.session.award(3100);
        tick(&mut s, &frame(200.0));
        assert!(s.environment().rain_active);
        assert!(s.environment_machine().has_active_effects());

        tick(&mut s, &frame(450.0));
        let x = s.player_x();
        s.field.obstacles_mut().insert(0, Obstacle::new(707, x, 0.0));
        tick(&mut s, &frame(470.0));
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert!(!s.environment_machine().has_active_effects());

        s.reset(2000.0);
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert_eq!(s.score(), 0);
        assert_eq!(s.session().display_score, 0);
        assert!(!s.session().game_started);
        assert!(!s.session().game_over);
        assert!(s.field().is_empty());
        assert!(!s.player().is_jumping);
        assert!(!s.environment_machine().has_active_effects());
        let env = s.environment();
        assert!(!env.rain_active && !env.snow_active);
        assert_eq!(env.lightning_phase, 0);
        assert_eq!(s.speed(), 8.0);
        assert_eq!(s.drain_events().last(), Some(&GameEvent::Reset));
    }

    #[test]
    fn test_reset_while_running_cancels_held_input() {
        let mut s = session();
        s.press(0.0);
        assert!(s.input_held());
        tick(&mut s, &frame(FRAME_MS));
        s.reset(100.0);
        assert!(!s.input_held());
        // Stale repeat beats can't restart the run
        tick(&mut s, &frame(600.0));
        assert_eq!(s.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_hold_repeats_jumps_through_ticks() {
        let mut s = session();
        s.press(0.0);
        let mut now = 0.0;
        let mut jumps = 1;
        s.drain_events();
        while now < 2000.0 - FRAME_MS {
            now += FRAME_MS;
            tick(&mut s, &frame(now));
            jumps += s
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::Jumped)
                .count();
        }
        s.release(2000.0);
        // The first obstacle needs ~4s to reach the player
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(jumps, 4);
    }

    #[test]
    fn test_environment_follows_score() {
        let mut s = session();
        s.tap(0.0);
        s.session.award(2500);
        tick(&mut s, &frame(FRAME_MS));
        let env = s.environment();
        assert!(env.scenery.lightning_window);
        assert_eq!(env.lightning_phase, 1);
        assert_eq!(env.scenery.sun_height, None);
        assert!(
            s.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Thunder { .. }))
        );
    }

    #[test]
    fn test_determinism() {
        let mut a = session();
        let mut b = session();
        for s in [&mut a, &mut b] {
            s.press(0.0);
            for i in 1..600 {
                tick(s, &frame(i as f64 * FRAME_MS));
                if i % 90 == 0 {
                    s.release(i as f64 * FRAME_MS);
                    s.press(i as f64 * FRAME_MS + 1.0);
                }
            }
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
