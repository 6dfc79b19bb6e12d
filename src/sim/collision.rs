//! Collision detection
//!
//! Axis-aligned boxes only. Vertical coordinates grow upward from the ground
//! baseline, so a jump raises the player's box. All comparisons are strict:
//! boxes that merely touch along an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Left/bottom corner
    pub min: Vec2,
    /// Right/top corner
    pub max: Vec2,
}

impl Aabb {
    /// Box from its left/bottom corner and size
    pub fn from_corner(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        let min = Vec2::new(left, bottom);
        Self {
            min,
            max: min + Vec2::new(width, height),
        }
    }

    /// Horizontal ranges overlap (strict)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }

    /// Vertical ranges overlap (strict)
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.min.y < other.max.y && self.max.y > other.min.y
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// Player hitbox at the fixed pixel position `player_x`
pub fn player_box(player_x: f32, jumping: bool) -> Aabb {
    let bottom = if jumping {
        PLAYER_JUMP_Y
    } else {
        PLAYER_GROUND_Y
    };
    Aabb::from_corner(
        player_x + PLAYER_HITBOX_INSET,
        bottom,
        PLAYER_HITBOX_WIDTH,
        PLAYER_HITBOX_HEIGHT,
    )
}

/// Obstacle hitbox for an obstacle whose sprite starts at `obstacle_x`
pub fn obstacle_box(obstacle_x: f32) -> Aabb {
    Aabb::from_corner(
        obstacle_x + OBSTACLE_HITBOX_INSET,
        OBSTACLE_GROUND_Y,
        OBSTACLE_HITBOX_WIDTH,
        OBSTACLE_HITBOX_HEIGHT,
    )
}

/// Does the player hit an obstacle at `obstacle_x`?
pub fn player_hits_obstacle(player_x: f32, jumping: bool, obstacle_x: f32) -> bool {
    player_box(player_x, jumping).overlaps(&obstacle_box(obstacle_x))
}

/// Index of the first obstacle the player hits, if any
///
/// Evaluation stops at the first hit (one life).
pub fn first_hit<I>(player_x: f32, jumping: bool, obstacle_xs: I) -> Option<usize>
where
    I: IntoIterator<Item = f32>,
{
    let player = player_box(player_x, jumping);
    obstacle_xs
        .into_iter()
        .position(|x| player.overlaps(&obstacle_box(x)))
}
