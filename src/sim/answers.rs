//! Answer tiles
//!
//! Each question puts four tiles in the maze: the correct answer and three
//! distractors. Tiles drift between anchor cells so the player has to chase
//! the right one.

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::maze::{CellFilter, Clearance, Maze};
use super::question::{Question, distractors};
use crate::consts::*;

/// Anchors kept per board so tiles have somewhere to wander
const MIN_ANCHORS: usize = 8;
/// Tiles keep out of this many cells around the maze centre
const CENTER_EXCLUSION_CELLS: f32 = 4.0;
/// New tiles spawn at least this far from the player
const PLAYER_CLEARANCE: f32 = 120.0;
/// Gap between a tile's edge and the canvas edge
const EDGE_MARGIN: f32 = 10.0;
/// Tiles closer than this to their target stop moving
const ARRIVE_DISTANCE: f32 = 2.0;
/// Frames between retargets, re-rolled each time
const RETARGET_MIN_FRAMES: u64 = 120;
const RETARGET_MAX_FRAMES: u64 = 180;

/// Used when the maze cannot supply enough anchors
pub const FALLBACK_ANCHORS: [Vec2; 8] = [
    Vec2::new(650.0, 100.0),
    Vec2::new(650.0, 450.0),
    Vec2::new(300.0, 450.0),
    Vec2::new(500.0, 200.0),
    Vec2::new(600.0, 200.0),
    Vec2::new(500.0, 350.0),
    Vec2::new(400.0, 100.0),
    Vec2::new(300.0, 300.0),
];

/// Feedback highlight on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Highlight {
    #[default]
    None,
    Correct,
    Wrong,
}

/// One candidate answer floating in the maze
#[derive(Debug, Clone)]
pub struct AnswerTile {
    pub value: i32,
    /// Centre of the tile
    pub pos: Vec2,
    pub target: Vec2,
    pub width: f32,
    pub height: f32,
    pub is_correct: bool,
    pub highlighted: Highlight,
    /// Pixels per frame
    pub speed: f32,
    /// Frame of the last retarget
    pub last_move_frame: u64,
    /// Frames to wait after `last_move_frame` before retargeting
    pub retarget_after: u64,
}

impl AnswerTile {
    fn new(value: i32, pos: Vec2, is_correct: bool, frame: u64, rng: &mut impl Rng) -> Self {
        Self {
            value,
            pos,
            target: pos,
            width: TILE_WIDTH,
            height: TILE_HEIGHT,
            is_correct,
            highlighted: Highlight::None,
            speed: 0.5 + rng.random::<f32>() * 0.5,
            last_move_frame: frame,
            retarget_after: rng.random_range(RETARGET_MIN_FRAMES..=RETARGET_MAX_FRAMES),
        }
    }

    /// Square used against walls
    pub fn collision_size(&self) -> f32 {
        self.width.min(self.height) * 0.8
    }

    /// Box overlap with a square of side `size` centred on `pos`
    pub fn overlaps(&self, pos: Vec2, size: f32) -> bool {
        let half = size / 2.0;
        pos.x + half > self.pos.x - self.width / 2.0
            && pos.x - half < self.pos.x + self.width / 2.0
            && pos.y + half > self.pos.y - self.height / 2.0
            && pos.y - half < self.pos.y + self.height / 2.0
    }

    /// Pick a new anchor to drift toward once the current leg has run long enough
    pub fn retarget(&mut self, anchors: &[Vec2], frame: u64, rng: &mut impl Rng) -> bool {
        if frame.saturating_sub(self.last_move_frame) <= self.retarget_after {
            return false;
        }
        if let Some(anchor) = anchors.choose(rng) {
            self.target = *anchor;
            self.last_move_frame = frame;
            self.retarget_after = rng.random_range(RETARGET_MIN_FRAMES..=RETARGET_MAX_FRAMES);
            return true;
        }
        false
    }

    /// Move one frame toward the target. A blocked step is dropped and a new
    /// target is chosen right away.
    pub fn advance(&mut self, maze: &Maze, anchors: &[Vec2], rng: &mut impl Rng) {
        let to_target = self.target - self.pos;
        let distance = to_target.length();
        if distance <= ARRIVE_DISTANCE {
            return;
        }

        let next = self.pos + to_target / distance * self.speed;
        if maze.collides(next, self.collision_size()) {
            if let Some(anchor) = anchors.choose(rng) {
                self.target = *anchor;
            }
        } else {
            self.pos = next;
        }
    }
}

/// The live question and its tiles
#[derive(Debug, Clone)]
pub struct AnswerBoard {
    pub question: Question,
    pub tiles: Vec<AnswerTile>,
    /// Positions tiles spawn at and wander between
    pub anchors: Vec<Vec2>,
}

impl AnswerBoard {
    /// Lay out the correct answer plus distractors for `question`.
    ///
    /// Always produces `TILE_COUNT` tiles with exactly one correct.
    pub fn generate(
        question: Question,
        maze: &Maze,
        player_pos: Vec2,
        frame: u64,
        rng: &mut impl Rng,
    ) -> Self {
        let correct = question.correct_answer;
        let mut values = vec![correct];
        values.extend(distractors(correct, TILE_COUNT - 1, rng));
        values.shuffle(rng);

        let mut anchors = tile_anchors(maze, player_pos, Clearance::Square2x2);
        if anchors.len() < MIN_ANCHORS {
            log::debug!("Only {} roomy tile anchors, topping up", anchors.len());
            top_up_anchors(&mut anchors, maze, player_pos);
        }
        anchors.shuffle(rng);

        let tiles = values
            .iter()
            .zip(anchors.iter())
            .map(|(&value, &pos)| AnswerTile::new(value, pos, value == correct, frame, rng))
            .collect();

        log::debug!("Question '{}' with answers {:?}", question.text, values);

        Self {
            question,
            tiles,
            anchors,
        }
    }

    pub fn correct_tile(&self) -> Option<&AnswerTile> {
        self.tiles.iter().find(|t| t.is_correct)
    }

    /// Index of the first tile the player's box overlaps
    pub fn touched_by(&self, pos: Vec2, size: f32) -> Option<usize> {
        self.tiles.iter().position(|t| t.overlaps(pos, size))
    }

    /// Highlight a pick: a correct pick lights green; a wrong pick lights
    /// red and reveals the correct tile
    pub fn reveal(&mut self, chosen: usize) {
        let Some(tile) = self.tiles.get(chosen) else {
            return;
        };
        if tile.is_correct {
            self.tiles[chosen].highlighted = Highlight::Correct;
            return;
        }
        self.tiles[chosen].highlighted = Highlight::Wrong;
        for tile in self.tiles.iter_mut().filter(|t| t.is_correct) {
            tile.highlighted = Highlight::Correct;
        }
    }

    /// Retarget and move every tile
    pub fn update(&mut self, maze: &Maze, frame: u64, rng: &mut impl Rng) {
        for tile in &mut self.tiles {
            tile.retarget(&self.anchors, frame, rng);
            tile.advance(maze, &self.anchors, rng);
        }
    }
}

/// Open cells with room for a tile, away from the centre and the player,
/// fully on the canvas
fn tile_anchors(maze: &Maze, player_pos: Vec2, clearance: Clearance) -> Vec<Vec2> {
    let filter = CellFilter::with_border(2)
        .clearance(clearance)
        .away_from_center(CENTER_EXCLUSION_CELLS)
        .away_from(player_pos, PLAYER_CLEARANCE);

    let half_w = TILE_WIDTH / 2.0;
    let half_h = TILE_HEIGHT / 2.0;
    maze.open_cells(&filter)
        .into_iter()
        .map(|cell| maze.cell_center(cell))
        .filter(|p| {
            p.x - half_w > EDGE_MARGIN
                && p.y - half_h > EDGE_MARGIN
                && p.x + half_w < CANVAS_WIDTH - EDGE_MARGIN
                && p.y + half_h < CANVAS_HEIGHT - EDGE_MARGIN
        })
        .collect()
}

/// Fill up to `MIN_ANCHORS`: wall-free fallback points, then any open cell
/// centre, then the remaining fallback points so a round is always playable
fn top_up_anchors(anchors: &mut Vec<Vec2>, maze: &Maze, player_pos: Vec2) {
    let size = TILE_WIDTH.min(TILE_HEIGHT) * 0.8;
    let (free, blocked): (Vec<Vec2>, Vec<Vec2>) = FALLBACK_ANCHORS
        .iter()
        .partition(|p| !maze.collides(**p, size));
    let cramped = tile_anchors(maze, player_pos, Clearance::None);

    let candidates = free.into_iter().chain(cramped).chain(blocked);
    for p in candidates {
        if anchors.len() >= MIN_ANCHORS {
            break;
        }
        if !anchors.contains(&p) {
            anchors.push(p);
        }
    }
    if anchors.iter().any(|p| maze.collides(*p, size)) {
        log::warn!("Tile anchors fell back to points inside walls");
    }
}
