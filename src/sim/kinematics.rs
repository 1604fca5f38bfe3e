//! Player movement
//!
//! Each direction is resolved as its own axis move so a diagonal input
//! against a wall still slides along it. There is no diagonal speed
//! normalization.

use glam::Vec2;

use super::maze::Maze;
use crate::consts::*;

/// Directional input snapshot for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Direction {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The player's shark
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(50.0, 50.0),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    /// Square used against walls
    pub fn collision_size(&self) -> f32 {
        self.size * COLLISION_SHRINK
    }

    /// Move one frame under `input`
    pub fn step(&mut self, input: Direction, maze: &Maze) {
        self.pos = step(self.pos, input, self.speed, self.collision_size(), maze);
        self.pos = wrap_and_clamp(self.pos, self.size);
    }
}

/// Resolve one frame of axis-independent movement.
///
/// Left, right, up and down are tried in that order; each is accepted only
/// if the square of side `collision_size` is free at the candidate.
pub fn step(pos: Vec2, input: Direction, speed: f32, collision_size: f32, maze: &Maze) -> Vec2 {
    let mut pos = pos;
    let moves = [
        (input.left, Vec2::new(-speed, 0.0)),
        (input.right, Vec2::new(speed, 0.0)),
        (input.up, Vec2::new(0.0, -speed)),
        (input.down, Vec2::new(0.0, speed)),
    ];
    for (pressed, delta) in moves {
        if !pressed {
            continue;
        }
        let candidate = pos + delta;
        if !maze.collides(candidate, collision_size) {
            pos = candidate;
        }
    }
    pos
}

/// Tunnel wrap horizontally, clamp vertically.
///
/// Shared by everything that roams the maze.
pub fn wrap_and_clamp(pos: Vec2, size: f32) -> Vec2 {
    let margin = size / 2.0;
    let mut x = pos.x;
    if x < -margin {
        x = CANVAS_WIDTH + margin;
    } else if x > CANVAS_WIDTH + margin {
        x = -margin;
    }
    let y = pos
        .y
        .clamp(margin + VERTICAL_PADDING, CANVAS_HEIGHT - margin - VERTICAL_PADDING);
    Vec2::new(x, y)
}
