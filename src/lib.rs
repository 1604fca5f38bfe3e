//! Math Shark - An arithmetic maze arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, enemy AI, answers, scoring)
//! - `driver`: Per-frame loop driver (update then draw)
//! - `scene`: Renderable snapshot handed to the display layer
//! - `record`: Completed-game record handed to persistence
//! - `config`: Data-driven rules and difficulty table
//! - `highscores`: Local top-10 leaderboard
//! - `platform`: Browser bindings, logging setup and run seeds

pub mod config;
pub mod driver;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod record;
pub mod scene;
pub mod sim;

pub use config::{DifficultyLevel, GameConfig};
pub use driver::{FrameDriver, FrameStatus, Renderer};
pub use error::ConfigError;
pub use highscores::HighScores;
pub use record::{GameRecord, RecordSink};
pub use scene::Scene;

/// Game configuration constants
pub mod consts {
    /// Simulation frame rate (speeds are pixels per frame)
    pub const FRAME_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 25.0;
    pub const PLAYER_SPEED: f32 = 2.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 25.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.5;
    pub const ENEMY_BASE_COUNT: usize = 6;
    pub const ENEMY_MAX_COUNT: usize = 8;
    /// Number of enemy sprite variants the display layer cycles through
    pub const ENEMY_VARIANTS: u8 = 3;

    /// Movers collide with walls using a shrunken square
    pub const COLLISION_SHRINK: f32 = 0.6;
    /// Extra vertical margin kept from the canvas top/bottom edges
    pub const VERTICAL_PADDING: f32 = 5.0;

    /// Answer tile dimensions
    pub const TILE_WIDTH: f32 = 35.0;
    pub const TILE_HEIGHT: f32 = 30.0;
    /// Tiles per question
    pub const TILE_COUNT: usize = 4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_to_vec(theta: f32) -> glam::Vec2 {
    glam::Vec2::new(theta.cos(), theta.sin())
}
