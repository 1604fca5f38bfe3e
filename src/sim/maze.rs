//! Maze layouts and wall collision
//!
//! A maze is a tile layout scaled to the canvas. Wall tiles become
//! axis-aligned rectangles; everything that moves asks `collides` before
//! committing a step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Built-in layouts, `#` is wall and `.` is open water.
/// Open cells on the left/right edge form wraparound tunnels.
pub const LAYOUTS: [&[&str]; 3] = [
    &[
        "################################",
        "#..............##..............#",
        "#.####.#####.#.##.#.#####.####.#",
        "#............#.##.#............#",
        "#.####.##.####.##.####.##.####.#",
        "#......##..............##......#",
        "######.#####.######.#####.######",
        ".....#.#####.######.#####.#.....",
        ".....#.##..............##.#.....",
        "######.##.###......###.##.######",
        "..........#..........#..........",
        "######.##.#..........#.##.######",
        ".....#.##.############.##.#.....",
        ".....#.##..............##.#.....",
        "######.#####.######.#####.######",
        "#............######............#",
        "#.####.#####.######.#####.####.#",
        "#....#....................#....#",
        "###..#.##.############.##.#..###",
        "#......##......##......##......#",
        "#.##########.#.##.#.##########.#",
        "#............#.##.#............#",
        "################################",
    ],
    &[
        "################################",
        "#........######..#######.......#",
        "#.###.##.#....#..#....#.##.###.#",
        "#.#...##.#.##.#..#.##.#.##...#.#",
        "#.#.####...##......##...####.#.#",
        "#...#....######..######....#...#",
        "###.#.####....#..#....####.#.###",
        "....#.#....##.#..#.##....#.#....",
        "#####.#.#####.#..#.#####.#.#####",
        "#.....#.#..............#.#.....#",
        "#.#####.#.#####..#####.#.#####.#",
        "#.......#.....#..#.....#.......#",
        "###.#########.#..#.########.####",
        "#...#.......#......#......#....#",
        "#.###.#####.########.#####.###.#",
        "#.....#...#....##....#...#.....#",
        "#####.#.#.####.##.####.#.#.#####",
        "#...#.#.#....#.##.#....#.#.#...#",
        "#.#.#...####.#....#.####...#.#.#",
        "#.#...###..#.######.#..###...#.#",
        "#.#####....#........#....#####.#",
        "#.......################.......#",
        "################################",
    ],
    &[
        "################################",
        "#..............................#",
        "#.####.######.####.######.####.#",
        "#..............................#",
        "#.####.##.############.##.####.#",
        "#......##......##......##......#",
        "######.#####.#.##.#.#####.######",
        ".....#.#####.#.##.#.#####.#.....",
        ".....#.##..............##.#.....",
        ".....#.##.###......###.##.#.....",
        "######.##.#..........#.##.######",
        "..........#..........#..........",
        "######.##.#..........#.##.######",
        ".....#.##.############.##.#.....",
        ".....#.##..............##.#.....",
        ".....#.#####.######.#####.#.....",
        "######.#####.######.#####.######",
        "#..............##..............#",
        "#.####.#######.##.#######.####.#",
        "#....#....................#....#",
        "###..#.##.############.##.#..###",
        "#......##......##......##......#",
        "################################",
    ],
];

/// An immutable axis-aligned wall rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Wall {
    /// Strict overlap with a square of side `size` centred on `pos`
    #[inline]
    pub fn overlaps_square(&self, pos: Vec2, size: f32) -> bool {
        let half = size / 2.0;
        pos.x - half < self.x + self.width
            && pos.x + half > self.x
            && pos.y - half < self.y + self.height
            && pos.y + half > self.y
    }
}

/// A grid cell (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Neighbourhood that must be open around a candidate cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clearance {
    /// Only the cell itself
    #[default]
    None,
    /// The cell plus its right, lower and lower-right neighbours
    Square2x2,
    /// The full 3×3 block centred on the cell
    Ring,
}

/// Criteria for open-cell enumeration
#[derive(Debug, Clone, Default)]
pub struct CellFilter {
    /// Rows/cols to skip along every edge
    pub border: usize,
    pub clearance: Clearance,
    /// Minimum distance (in cells) from the maze centre cell
    pub min_cells_from_center: f32,
    /// Minimum pixel distance of the cell centre from each point
    pub exclusions: Vec<(Vec2, f32)>,
}

impl CellFilter {
    pub fn with_border(border: usize) -> Self {
        Self {
            border,
            ..Default::default()
        }
    }

    pub fn clearance(mut self, clearance: Clearance) -> Self {
        self.clearance = clearance;
        self
    }

    pub fn away_from_center(mut self, cells: f32) -> Self {
        self.min_cells_from_center = cells;
        self
    }

    pub fn away_from(mut self, point: Vec2, min_distance: f32) -> Self {
        self.exclusions.push((point, min_distance));
        self
    }
}

/// The maze for one level
#[derive(Debug, Clone)]
pub struct Maze {
    /// Which built-in layout this maze uses (None for custom layouts)
    pub layout_index: Option<usize>,
    pub rows: usize,
    pub cols: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Row-major, true = wall
    solid: Vec<bool>,
    walls: Vec<Wall>,
}

impl Maze {
    /// Layout index for a 1-based level
    pub fn layout_for_level(level: u32) -> usize {
        (level.max(1) as usize - 1) % LAYOUTS.len()
    }

    /// Build the maze for a 1-based level at canvas resolution
    pub fn for_level(level: u32) -> Self {
        let index = Self::layout_for_level(level);
        let mut maze = Self::from_layout(LAYOUTS[index], CANVAS_WIDTH, CANVAS_HEIGHT);
        maze.layout_index = Some(index);
        maze
    }

    /// Build a maze from `#`/`.` rows scaled to `width` × `height`.
    /// Short rows are padded with wall.
    pub fn from_layout(rows: &[&str], width: f32, height: f32) -> Self {
        let row_count = rows.len().max(1);
        let col_count = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0).max(1);
        let cell_width = width / col_count as f32;
        let cell_height = height / row_count as f32;

        let mut solid = vec![true; row_count * col_count];
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                solid[row * col_count + col] = ch == '#';
            }
        }

        let mut walls = Vec::new();
        for row in 0..row_count {
            for col in 0..col_count {
                if solid[row * col_count + col] {
                    walls.push(Wall {
                        x: col as f32 * cell_width,
                        y: row as f32 * cell_height,
                        width: cell_width,
                        height: cell_height,
                    });
                }
            }
        }

        Self {
            layout_index: None,
            rows: row_count,
            cols: col_count,
            cell_width,
            cell_height,
            solid,
            walls,
        }
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// True iff a square of side `size` centred on `pos` overlaps any wall
    pub fn collides(&self, pos: Vec2, size: f32) -> bool {
        self.walls.iter().any(|w| w.overlaps_square(pos, size))
    }

    /// Out-of-range cells count as wall
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && !self.solid[row * self.cols + col]
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.col as f32 + 0.5) * self.cell_width,
            (cell.row as f32 + 0.5) * self.cell_height,
        )
    }

    /// Centre cell of the grid
    pub fn center_cell(&self) -> Cell {
        Cell {
            row: self.rows / 2,
            col: self.cols / 2,
        }
    }

    /// Pixel centre of the canvas the maze was scaled to
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.cell_width / 2.0,
            self.rows as f32 * self.cell_height / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.cols as f32 * self.cell_width
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_height
    }

    /// Open cells in the 3×3 block centred on a cell (including itself)
    pub fn openness(&self, cell: Cell) -> usize {
        let mut open = 0;
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                let (r, c) = (cell.row as isize + dr, cell.col as isize + dc);
                if r >= 0 && c >= 0 && self.is_open(r as usize, c as usize) {
                    open += 1;
                }
            }
        }
        open
    }

    fn has_clearance(&self, cell: Cell, clearance: Clearance) -> bool {
        // Neighbours outside the grid are not checked
        let in_grid_wall = |r: isize, c: isize| {
            r >= 0
                && c >= 0
                && (r as usize) < self.rows
                && (c as usize) < self.cols
                && self.solid[r as usize * self.cols + c as usize]
        };
        let (row, col) = (cell.row as isize, cell.col as isize);
        match clearance {
            Clearance::None => true,
            Clearance::Square2x2 => {
                !(0..=1).any(|dr| (0..=1).any(|dc| in_grid_wall(row + dr, col + dc)))
            }
            Clearance::Ring => {
                !(-1..=1).any(|dr| (-1..=1).any(|dc| in_grid_wall(row + dr, col + dc)))
            }
        }
    }

    /// Open cells matching the filter, in row-major order
    pub fn open_cells(&self, filter: &CellFilter) -> Vec<Cell> {
        let center = self.center_cell();
        let mut cells = Vec::new();

        let rows = filter.border..self.rows.saturating_sub(filter.border);
        for row in rows {
            for col in filter.border..self.cols.saturating_sub(filter.border) {
                if !self.is_open(row, col) {
                    continue;
                }
                let cell = Cell { row, col };

                if filter.min_cells_from_center > 0.0 {
                    let dr = row as f32 - center.row as f32;
                    let dc = col as f32 - center.col as f32;
                    if (dr * dr + dc * dc).sqrt() < filter.min_cells_from_center {
                        continue;
                    }
                }

                if !self.has_clearance(cell, filter.clearance) {
                    continue;
                }

                let pos = self.cell_center(cell);
                if filter
                    .exclusions
                    .iter()
                    .any(|(point, min)| pos.distance(*point) < *min)
                {
                    continue;
                }

                cells.push(cell);
            }
        }
        cells
    }
}
