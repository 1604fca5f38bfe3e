//! Per-frame snapshot handed to the display layer
//!
//! Everything a renderer needs to draw one frame, detached from the
//! simulation so it can be serialized across the wasm boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EnemyMode, GamePhase, GameState, Highlight, Wall};

/// Blink period while invulnerable, in frames
const BLINK_FRAMES: u64 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    /// Hide the sprite this frame (invulnerability blink)
    pub blink: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: f32,
    pub mode: EnemyMode,
    pub variant: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub value: i32,
    /// Centre
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub time_remaining: u32,
    pub question: String,
    pub difficulty: String,
    pub phase: GamePhase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub walls: Vec<Wall>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub tiles: Vec<TileView>,
    pub hud: Hud,
}

impl Scene {
    pub fn from_state(state: &GameState) -> Self {
        let blink = state.is_invulnerable() && (state.frame / BLINK_FRAMES) % 2 == 0;

        Self {
            width: state.maze.width(),
            height: state.maze.height(),
            walls: state.maze.walls().to_vec(),
            player: PlayerView {
                pos: state.player.pos,
                size: state.player.size,
                blink,
            },
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    pos: e.pos,
                    size: e.size,
                    mode: e.mode,
                    variant: e.variant,
                })
                .collect(),
            tiles: state
                .board
                .tiles
                .iter()
                .map(|t| TileView {
                    value: t.value,
                    pos: t.pos,
                    width: t.width,
                    height: t.height,
                    highlight: t.highlighted,
                })
                .collect(),
            hud: Hud {
                score: state.score,
                lives: state.lives,
                level: state.level,
                time_remaining: state.time_remaining,
                question: state.board.question.text.clone(),
                difficulty: state.board.question.difficulty_label.clone(),
                phase: state.phase,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
