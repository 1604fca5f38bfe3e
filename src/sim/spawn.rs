//! Safe player placement
//!
//! Used at level start, after losing a life and after a correct answer.
//! Each tier relaxes the previous one until something fits; the last resort
//! is a fixed point.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::maze::{Cell, CellFilter, Clearance, Maze};
use crate::consts::*;

/// Keep away from the canvas centre (enemies tend to gather there)
const CENTER_CLEARANCE: f32 = 120.0;
const TILE_CLEARANCE: f32 = 80.0;
const ENEMY_CLEARANCE: f32 = 100.0;
const RANDOM_ATTEMPTS: u32 = 100;
const LAST_RESORT: Vec2 = Vec2::new(75.0, 75.0);

/// Points the player must not land near
#[derive(Debug, Clone, Default)]
pub struct Avoid {
    pub tiles: Vec<Vec2>,
    pub enemies: Vec<Vec2>,
}

fn fallback_points() -> [Vec2; 10] {
    let (w, h) = (CANVAS_WIDTH, CANVAS_HEIGHT);
    [
        Vec2::new(75.0, 75.0),
        Vec2::new(75.0, h - 75.0),
        Vec2::new(w - 75.0, 75.0),
        Vec2::new(w - 75.0, h - 75.0),
        Vec2::new(w / 4.0, 75.0),
        Vec2::new(3.0 * w / 4.0, 75.0),
        Vec2::new(75.0, h / 4.0),
        Vec2::new(w - 75.0, h / 4.0),
        Vec2::new(w / 4.0, 3.0 * h / 4.0),
        Vec2::new(3.0 * w / 4.0, 3.0 * h / 4.0),
    ]
}

fn safe_filter(maze: &Maze, clearance: Clearance, avoid: &Avoid) -> CellFilter {
    let mut filter = CellFilter::with_border(2)
        .clearance(clearance)
        .away_from(maze.center(), CENTER_CLEARANCE);
    for tile in &avoid.tiles {
        filter = filter.away_from(*tile, TILE_CLEARANCE);
    }
    for enemy in &avoid.enemies {
        filter = filter.away_from(*enemy, ENEMY_CLEARANCE);
    }
    filter
}

fn pick_cell(maze: &Maze, cells: &[Cell], rng: &mut impl Rng) -> Option<Vec2> {
    cells.choose(rng).map(|cell| maze.cell_center(*cell))
}

/// A position for the player clear of walls (for a square of
/// `collision_size`) and, when possible, away from the centre, tiles and
/// enemies
pub fn safe_player_position(
    maze: &Maze,
    avoid: &Avoid,
    collision_size: f32,
    rng: &mut impl Rng,
) -> Vec2 {
    // Roomy cells first, then any cell meeting the distance rules
    for clearance in [Clearance::Ring, Clearance::None] {
        let cells = maze.open_cells(&safe_filter(maze, clearance, avoid));
        if let Some(pos) = pick_cell(maze, &cells, rng) {
            return pos;
        }
    }

    log::warn!("No safe cell for player, trying fallback points");

    if let Some(pos) = fallback_points()
        .into_iter()
        .find(|p| !maze.collides(*p, collision_size))
    {
        return pos;
    }

    let open = maze.open_cells(&CellFilter::with_border(1));
    if let Some(pos) = pick_cell(maze, &open, rng) {
        return pos;
    }

    for _ in 0..RANDOM_ATTEMPTS {
        let pos = Vec2::new(
            rng.random::<f32>() * (CANVAS_WIDTH - 100.0) + 50.0,
            rng.random::<f32>() * (CANVAS_HEIGHT - 100.0) + 50.0,
        );
        if !maze.collides(pos, collision_size) {
            return pos;
        }
    }

    log::warn!("Player placement exhausted, using {LAST_RESORT}");
    LAST_RESORT
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SIZE: f32 = PLAYER_SIZE * COLLISION_SHRINK;

    #[test]
    fn test_safe_position_respects_avoid_lists() {
        let mut rng = Pcg32::seed_from_u64(1);
        for level in 1..=3 {
            let maze = Maze::for_level(level);
            let avoid = Avoid {
                tiles: vec![Vec2::new(100.0, 100.0), Vec2::new(700.0, 500.0)],
                enemies: vec![Vec2::new(60.0, 540.0), Vec2::new(740.0, 60.0)],
            };
            for _ in 0..20 {
                let pos = safe_player_position(&maze, &avoid, SIZE, &mut rng);
                assert!(!maze.collides(pos, SIZE));
                assert!(pos.distance(maze.center()) >= CENTER_CLEARANCE);
                for tile in &avoid.tiles {
                    assert!(pos.distance(*tile) >= TILE_CLEARANCE);
                }
                for enemy in &avoid.enemies {
                    assert!(pos.distance(*enemy) >= ENEMY_CLEARANCE);
                }
            }
        }
    }

    #[test]
    fn test_crowded_maze_still_places_player() {
        let mut rng = Pcg32::seed_from_u64(2);
        let maze = Maze::for_level(2);
        // Enemies everywhere: every distance rule fails
        let enemies = maze
            .open_cells(&CellFilter::default())
            .into_iter()
            .map(|c| maze.cell_center(c))
            .collect();
        let avoid = Avoid {
            tiles: Vec::new(),
            enemies,
        };
        let pos = safe_player_position(&maze, &avoid, SIZE, &mut rng);
        assert!(!maze.collides(pos, SIZE));
    }

    #[test]
    fn test_solid_maze_uses_last_resort() {
        let mut rng = Pcg32::seed_from_u64(3);
        let maze = Maze::from_layout(&["#"], CANVAS_WIDTH, CANVAS_HEIGHT);
        let pos = safe_player_position(&maze, &Avoid::default(), SIZE, &mut rng);
        assert_eq!(pos, LAST_RESORT);
    }
}
