//! Enemy AI: patrol and chase.
//!
//! Mode switching uses two thresholds so an enemy hovering at one distance
//! never flips back and forth:
//!
//! ```text
//!   Patrol --(distance < detection_range)--> Chase
//!   Chase  --(distance > lose_range)-------> Patrol
//! ```

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::kinematics::wrap_and_clamp;
use super::maze::{CellFilter, Maze};
use crate::config::GameConfig;
use crate::consts::*;
use crate::{heading_to_vec, normalize_angle};

/// Patrol heading changes after a random number of frames in this range
const PATROL_TURN_MIN_FRAMES: u32 = 60;
const PATROL_TURN_MAX_FRAMES: u32 = 180;
/// Cardinal headings tried when a patrol move is blocked
const CARDINALS: [f32; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
/// Spawn points closer than this to the player are skipped
const SPAWN_PLAYER_CLEARANCE: f32 = 100.0;
/// Minimum openness (open cells in the 3×3 block) of a spawn cell
const SPAWN_MIN_OPENNESS: usize = 5;
const SPAWN_CANDIDATES: usize = 8;
/// Below this many maze spawn points the fixed list is used instead
const SPAWN_MIN_POINTS: usize = 5;
const SPAWN_NUDGE_ATTEMPTS: u32 = 10;

/// Behaviour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyMode {
    #[default]
    Patrol,
    Chase,
}

/// Thresholds for mode switching
#[derive(Debug, Clone, Copy)]
pub struct AiTuning {
    pub detection_range: f32,
    pub lose_range: f32,
}

impl From<&GameConfig> for AiTuning {
    fn from(config: &GameConfig) -> Self {
        Self {
            detection_range: config.detection_range,
            lose_range: config.lose_range,
        }
    }
}

/// An enemy roaming the maze
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    /// Per-frame speed, fixed for the enemy's lifetime
    pub speed: f32,
    /// Level-scaled speed the enemy spawned with
    pub base_speed: f32,
    /// Heading in radians
    pub heading: f32,
    pub mode: EnemyMode,
    /// Frames since the last patrol heading change
    pub change_direction_timer: u32,
    /// Frames until the next patrol heading change
    pub change_direction_after: u32,
    /// Sprite variant for the display layer
    pub variant: u8,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32, variant: u8, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            size: ENEMY_SIZE,
            speed,
            base_speed: speed,
            heading: rng.random::<f32>() * TAU,
            mode: EnemyMode::Patrol,
            change_direction_timer: 0,
            change_direction_after: rng.random_range(PATROL_TURN_MIN_FRAMES..=PATROL_TURN_MAX_FRAMES),
            variant,
        }
    }

    /// Square used against walls
    pub fn collision_size(&self) -> f32 {
        self.size * COLLISION_SHRINK
    }

    /// Apply the hysteresis rule for the current distance to the player
    pub fn update_mode(&mut self, distance: f32, tuning: &AiTuning, rng: &mut impl Rng) {
        match self.mode {
            EnemyMode::Patrol if distance < tuning.detection_range => {
                self.mode = EnemyMode::Chase;
            }
            EnemyMode::Chase if distance > tuning.lose_range => {
                self.mode = EnemyMode::Patrol;
                self.heading = rng.random::<f32>() * TAU;
                self.reset_turn_timer(rng);
            }
            _ => {}
        }
    }

    /// Advance one frame
    pub fn update(&mut self, player_pos: Vec2, maze: &Maze, tuning: &AiTuning, rng: &mut impl Rng) {
        let to_player = player_pos - self.pos;
        self.update_mode(to_player.length(), tuning, rng);

        match self.mode {
            EnemyMode::Chase => {
                self.heading = to_player.y.atan2(to_player.x);
            }
            EnemyMode::Patrol => {
                self.change_direction_timer += 1;
                if self.change_direction_timer > self.change_direction_after {
                    self.heading = rng.random::<f32>() * TAU;
                    self.reset_turn_timer(rng);
                }
            }
        }

        let moved = self.try_move(maze);
        if !moved && self.mode == EnemyMode::Patrol {
            self.pick_open_cardinal(maze);
        }

        self.pos = wrap_and_clamp(self.pos, self.size);
    }

    /// Full step, falling back to x-only and y-only sub-steps
    fn try_move(&mut self, maze: &Maze) -> bool {
        let size = self.collision_size();
        let target = self.pos + heading_to_vec(self.heading) * self.speed;

        if !maze.collides(target, size) {
            self.pos = target;
            return true;
        }

        // A sub-step that goes nowhere does not count as moving
        let mut moved = false;
        let horizontal = Vec2::new(target.x, self.pos.y);
        if horizontal != self.pos && !maze.collides(horizontal, size) {
            self.pos = horizontal;
            moved = true;
        }
        let vertical = Vec2::new(self.pos.x, target.y);
        if vertical != self.pos && !maze.collides(vertical, size) {
            self.pos = vertical;
            moved = true;
        }
        moved
    }

    /// Turn to the first free cardinal heading other than the current one;
    /// hold position if every way is blocked
    fn pick_open_cardinal(&mut self, maze: &Maze) {
        let size = self.collision_size();
        for dir in CARDINALS {
            if normalize_angle(dir - self.heading).abs() <= 0.1 {
                continue;
            }
            let ahead = self.pos + heading_to_vec(dir) * self.speed;
            if !maze.collides(ahead, size) {
                self.heading = dir;
                self.change_direction_timer = 0;
                return;
            }
        }
    }

    fn reset_turn_timer(&mut self, rng: &mut impl Rng) {
        self.change_direction_timer = 0;
        self.change_direction_after = rng.random_range(PATROL_TURN_MIN_FRAMES..=PATROL_TURN_MAX_FRAMES);
    }
}

/// Number of enemies on a level
pub fn enemy_count(level: u32) -> usize {
    (ENEMY_BASE_COUNT + level as usize / 2).min(ENEMY_MAX_COUNT)
}

/// Fixed spawn points used when the maze has too few open areas
fn fallback_spawns() -> [Vec2; 8] {
    let (w, h) = (CANVAS_WIDTH, CANVAS_HEIGHT);
    [
        Vec2::new(w - 100.0, h - 100.0),
        Vec2::new(100.0, h / 2.0),
        Vec2::new(w / 2.0, 100.0),
        Vec2::new(w - 100.0, h / 3.0),
        Vec2::new(w / 4.0, h - 100.0),
        Vec2::new(3.0 * w / 4.0, h / 4.0),
        Vec2::new(w / 3.0, 2.0 * h / 3.0),
        Vec2::new(2.0 * w / 3.0, h / 3.0),
    ]
}

/// The most open cells away from the player, best first
pub fn spawn_points(maze: &Maze, player_pos: Vec2) -> Vec<Vec2> {
    let filter = CellFilter::with_border(2).away_from(player_pos, SPAWN_PLAYER_CLEARANCE);
    let mut ranked: Vec<_> = maze
        .open_cells(&filter)
        .into_iter()
        .map(|cell| (maze.openness(cell), cell))
        .filter(|(openness, _)| *openness >= SPAWN_MIN_OPENNESS)
        .collect();
    // Stable: ties keep row-major order
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let points: Vec<Vec2> = ranked
        .into_iter()
        .take(SPAWN_CANDIDATES)
        .map(|(_, cell)| maze.cell_center(cell))
        .collect();

    if points.len() < SPAWN_MIN_POINTS {
        log::warn!("Only {} enemy spawn points, using fixed list", points.len());
        return fallback_spawns().to_vec();
    }
    points
}

/// Spawn the level's enemies with speed scaled once by the difficulty table
pub fn spawn_enemies(
    maze: &Maze,
    level: u32,
    config: &GameConfig,
    player_pos: Vec2,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let points = spawn_points(maze, player_pos);
    let speed = ENEMY_BASE_SPEED * config.difficulty(level).enemy_speed_multiplier;
    let count = enemy_count(level);

    let enemies: Vec<Enemy> = (0..count)
        .map(|i| {
            let spawn = points[i % points.len()];
            let pos = nudge_clear(spawn, maze, rng);
            Enemy::new(pos, speed, (i % ENEMY_VARIANTS as usize) as u8, rng)
        })
        .collect();

    log::debug!("Spawned {} enemies at speed {:.2}", enemies.len(), speed);
    enemies
}

/// Random nearby point clear of walls, or the spawn itself if none found
fn nudge_clear(spawn: Vec2, maze: &Maze, rng: &mut impl Rng) -> Vec2 {
    if !maze.collides(spawn, ENEMY_SIZE) {
        return spawn;
    }
    for _ in 0..SPAWN_NUDGE_ATTEMPTS {
        let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 100.0;
        let candidate = (spawn + offset).clamp(
            Vec2::splat(50.0),
            Vec2::new(CANVAS_WIDTH - 50.0, CANVAS_HEIGHT - 50.0),
        );
        if !maze.collides(candidate, ENEMY_SIZE) {
            return candidate;
        }
    }
    spawn
}
