//! Obstacle lifecycle: spawn, scroll, score, prune
//!
//! Obstacles are kept in spawn order, which is also left-to-right order since
//! each new obstacle is placed to the right of the previous one and all of
//! them scroll at the same speed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

pub type ObstacleId = u64;

/// A scrolling hazard (zombie)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    /// Left edge of the sprite, in pixels
    pub x: f32,
    /// Already awarded its crossing points
    pub scored: bool,
    /// Current walk-cycle frame
    pub frame: u8,
    /// Timestamp of the last frame advance
    pub frame_at: f64,
}

impl Obstacle {
    pub fn new(id: ObstacleId, x: f32, now_ms: f64) -> Self {
        Self {
            id,
            x,
            scored: false,
            frame: 0,
            frame_at: now_ms,
        }
    }

    /// Advance the walk cycle by wall-clock time, not by tick count
    pub fn animate(&mut self, now_ms: f64, interval_ms: f64, frame_count: u8) {
        if now_ms - self.frame_at >= interval_ms {
            self.frame = (self.frame + 1) % frame_count;
            self.frame_at = now_ms;
        }
    }
}

/// Per-tick inputs to the obstacle field
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    /// Normalized frame delta (0..=2)
    pub delta: f32,
    /// Pixels per normalized frame
    pub speed: f32,
    /// Player's fixed horizontal position in pixels
    pub player_x: f32,
    pub viewport_width: f32,
    pub now_ms: f64,
}

/// What happened during one obstacle step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStep {
    /// Sum of all crossing awards this tick
    pub points: u32,
    /// Obstacles that crossed the player this tick
    pub crossings: Vec<ObstacleId>,
    /// Obstacles that left the screen this tick
    pub pruned: Vec<ObstacleId>,
    pub spawned: Option<ObstacleId>,
}

/// Owns the ordered obstacle sequence
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    rng: Pcg32,
    next_id: ObstacleId,
}

impl ObstacleField {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Remove every obstacle (ids keep counting up)
    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Clear and restart the spacing RNG
    pub fn reseed(&mut self, seed: u64) {
        self.obstacles.clear();
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Advance every obstacle by one tick
    pub fn step(&mut self, p: &StepParams, tuning: &Tuning) -> FieldStep {
        assert!(
            p.speed.is_finite() && p.speed >= 0.0,
            "obstacle speed must be non-negative, got {}",
            p.speed
        );
        debug_assert!((0.0..=tuning.max_delta).contains(&p.delta));

        let mut out = FieldStep::default();
        let travel = p.speed * p.delta;

        for obs in &mut self.obstacles {
            let before = obs.x;
            obs.x = before - travel;
            obs.animate(p.now_ms, tuning.obstacle_frame_ms, tuning.obstacle_frame_count);

            if !obs.scored && before > p.player_x && obs.x <= p.player_x {
                obs.scored = true;
                out.points += tuning.points_per_crossing;
                out.crossings.push(obs.id);
                log::debug!("Obstacle {} crossed the player", obs.id);
            }
        }

        let prune_x = tuning.prune_x;
        self.obstacles.retain(|obs| {
            let keep = obs.x > prune_x;
            if !keep {
                out.pruned.push(obs.id);
            }
            keep
        });

        let needs_spawn = match self.obstacles.last() {
            None => true,
            Some(rightmost) => rightmost.x < p.viewport_width - tuning.spawn_window,
        };
        if needs_spawn {
            out.spawned = Some(self.spawn(p.viewport_width, p.now_ms, tuning));
        }

        out
    }

    fn spawn(&mut self, viewport_width: f32, now_ms: f64, tuning: &Tuning) -> ObstacleId {
        let x = match self.obstacles.last() {
            Some(rightmost) => {
                let spacing = self.rng.random_range(tuning.spacing_min..tuning.spacing_max);
                rightmost.x + spacing
            }
            None => viewport_width,
        };

        let id = self.next_id;
        self.next_id += 1;
        debug_assert!(self.obstacles.iter().all(|o| o.id != id));

        log::debug!("Spawned obstacle {} at x={:.1}", id, x);
        self.obstacles.push(Obstacle::new(id, x, now_ms));
        id
    }
}
