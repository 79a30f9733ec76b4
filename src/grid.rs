use tracing::debug;

use crate::error::{GridError, LayoutError};
use crate::layout::Layout;
use crate::BLOCK_SIZE;

pub const PELLET_POINTS: u32 = 1;
pub const POWER_PELLET_POINTS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
    Pellet,
    Consumed,
    PowerPellet,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Pellet),
            3 => Some(Tile::Consumed),
            4 => Some(Tile::PowerPellet),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Wall => 1,
            Tile::Pellet => 2,
            Tile::Consumed => 3,
            Tile::PowerPellet => 4,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Top-left corner of the cell in world units.
    pub fn origin(self) -> (f32, f32) {
        (self.col as f32 * BLOCK_SIZE, self.row as f32 * BLOCK_SIZE)
    }
}

/// Session tile state: an immutable canonical layout plus the working copy
/// that pellet consumption mutates.
#[derive(Clone, Debug)]
pub struct Grid {
    canonical: Layout,
    tiles: Layout,
}

impl Grid {
    pub fn new(layout: Layout) -> Self {
        let canonical = layout.canonical();
        Self {
            tiles: canonical.clone(),
            canonical,
        }
    }

    pub fn rows(&self) -> usize {
        self.tiles.rows()
    }

    pub fn cols(&self) -> usize {
        self.tiles.cols()
    }

    pub fn world_width(&self) -> f32 {
        self.cols() as f32 * BLOCK_SIZE
    }

    pub fn world_height(&self) -> f32 {
        self.rows() as f32 * BLOCK_SIZE
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Result<Tile, GridError> {
        self.tiles
            .get(Cell::new(row, col))
            .ok_or(GridError::OutOfBounds { row, col })
    }

    /// Wall test that treats anything outside the grid as solid.
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.tiles.get(cell).map_or(true, Tile::is_wall)
    }

    /// Clamps signed cell indices into the grid.
    pub fn clamp_cell(&self, row: i64, col: i64) -> Cell {
        let max_row = self.rows().saturating_sub(1) as i64;
        let max_col = self.cols().saturating_sub(1) as i64;
        Cell::new(row.clamp(0, max_row) as usize, col.clamp(0, max_col) as usize)
    }

    /// Eats whatever pellet sits on `cell` and returns its point value.
    pub fn consume(&mut self, cell: Cell) -> u32 {
        let points = match self.tiles.get(cell) {
            Some(Tile::Pellet) => PELLET_POINTS,
            Some(Tile::PowerPellet) => POWER_PELLET_POINTS,
            _ => return 0,
        };
        self.tiles.set(cell, Tile::Consumed);
        points
    }

    pub fn reset(&mut self) {
        self.tiles = self.canonical.clone();
    }

    /// Replaces both the canonical layout and the working copy. Layouts whose
    /// dimensions differ from the current one are rejected untouched.
    pub fn load_layout(&mut self, layout: Layout) -> Result<(), LayoutError> {
        if layout.dimensions() != self.tiles.dimensions() {
            return Err(LayoutError::DimensionMismatch {
                expected: self.tiles.dimensions(),
                found: layout.dimensions(),
            });
        }
        self.canonical = layout.canonical();
        self.tiles = self.canonical.clone();
        debug!(
            pellets = self.remaining_pellets(),
            "installed layout {}x{}",
            self.rows(),
            self.cols()
        );
        Ok(())
    }

    pub fn remaining_pellets(&self) -> usize {
        self.tiles
            .cells()
            .filter(|(_, tile)| matches!(tile, Tile::Pellet | Tile::PowerPellet))
            .count()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.cells()
    }

    /// Current working copy, including eaten pellets.
    pub fn layout(&self) -> &Layout {
        &self.tiles
    }

    pub fn canonical(&self) -> &Layout {
        &self.canonical
    }
}
