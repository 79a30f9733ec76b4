//! Wall and boundary overlap test for axis-aligned agent boxes.

use crate::grid::{Cell, Grid};
use crate::BLOCK_SIZE;

/// World-space bounding box. `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Unclamped (row, col) of the top-left, top-right, bottom-left and
    /// bottom-right corners. The far edges are exclusive, so a box that ends
    /// exactly on a tile boundary does not reach into the next tile.
    pub fn corner_indices(&self) -> [(i64, i64); 4] {
        let left = (self.x / BLOCK_SIZE).floor() as i64;
        let top = (self.y / BLOCK_SIZE).floor() as i64;
        let right = ((self.x + self.width) / BLOCK_SIZE).ceil() as i64 - 1;
        let bottom = ((self.y + self.height) / BLOCK_SIZE).ceil() as i64 - 1;
        [(top, left), (top, right), (bottom, left), (bottom, right)]
    }
}

/// Corner cells of `bounds`, clamped into the grid.
pub fn corner_cells(bounds: &Bounds, grid: &Grid) -> [Cell; 4] {
    bounds
        .corner_indices()
        .map(|(row, col)| grid.clamp_cell(row, col))
}

/// True when any corner of `bounds` is over a wall or the box pokes out of
/// the grid.
pub fn collides(bounds: &Bounds, grid: &Grid) -> bool {
    bounds.corner_indices().into_iter().any(|(row, col)| {
        let cell = grid.clamp_cell(row, col);
        let outside = cell.row as i64 != row || cell.col as i64 != col;
        outside || grid.is_wall(cell)
    })
}
