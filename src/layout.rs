//! Tile layouts and their plain-text persistence format.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::LayoutError;
use crate::grid::{Cell, Grid, Tile};

const BUILTIN_ROWS: usize = 23;
const BUILTIN_COLS: usize = 21;

#[rustfmt::skip]
const BUILTIN: [[u8; BUILTIN_COLS]; BUILTIN_ROWS] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 1, 2, 1],
    [1, 4, 1, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 4, 2, 1],
    [1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 1, 2, 1, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 4, 1, 2, 1, 1, 2, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 4, 1],
    [1, 1, 1, 1, 1, 2, 1, 2, 1, 2, 2, 2, 1, 2, 1, 2, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 1, 2, 1, 2, 1, 1, 1, 1, 1, 2, 1, 2, 1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1, 2, 1, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 1, 1, 1, 1, 1],
    [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 2, 1, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 1, 2, 1, 1, 1, 2, 1],
    [1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 1, 2, 2, 2, 1],
    [1, 1, 2, 2, 1, 2, 1, 2, 1, 1, 1, 1, 1, 2, 1, 2, 1, 2, 2, 1, 1],
    [1, 2, 2, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 1, 2, 2, 2, 4, 2, 1],
    [1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1],
    [1, 2, 4, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Row-major rectangle of tiles with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Layout {
    /// The maze shipped with the game.
    pub fn builtin() -> Self {
        let tiles = BUILTIN
            .iter()
            .flat_map(|row| row.iter())
            .map(|&code| Tile::from_code(code).unwrap_or(Tile::Wall))
            .collect();
        Self {
            rows: BUILTIN_ROWS,
            cols: BUILTIN_COLS,
            tiles,
        }
    }

    pub fn filled(rows: usize, cols: usize, tile: Tile) -> Self {
        Self {
            rows,
            cols,
            tiles: vec![tile; rows * cols],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, LayoutError> {
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let cols = first.len();
        if cols == 0 {
            return Err(LayoutError::Empty);
        }
        let mut tiles = Vec::with_capacity(rows.len() * cols);
        for (row, line) in rows.iter().enumerate() {
            if line.len() != cols {
                return Err(LayoutError::Ragged {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            tiles.extend_from_slice(line);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            tiles,
        })
    }

    /// Parses the text format: one line per row, whitespace-separated
    /// integer codes. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut rows = Vec::new();
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let row = rows.len();
            let mut tiles = Vec::new();
            for (col, token) in line.split_whitespace().enumerate() {
                let value: i64 = token.parse().map_err(|_| LayoutError::NotAnInteger {
                    row,
                    col,
                    token: token.to_owned(),
                })?;
                let tile = u8::try_from(value)
                    .ok()
                    .and_then(Tile::from_code)
                    .ok_or(LayoutError::InvalidCode { row, col, value })?;
                tiles.push(tile);
            }
            rows.push(tiles);
        }
        Self::from_rows(rows)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() * 2);
        for row in self.tiles.chunks(self.cols) {
            let codes: Vec<String> = row.iter().map(|tile| tile.code().to_string()).collect();
            out.push_str(&codes.join(" "));
            out.push('\n');
        }
        out
    }

    pub fn read_from(path: &Path) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), LayoutError> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn get(&self, cell: Cell) -> Option<Tile> {
        if !self.contains(cell) {
            return None;
        }
        self.tiles.get(cell.row * self.cols + cell.col).copied()
    }

    /// Overwrites one tile; returns `false` when the cell is outside the layout.
    pub fn set(&mut self, cell: Cell, tile: Tile) -> bool {
        if !self.contains(cell) {
            return false;
        }
        self.tiles[cell.row * self.cols + cell.col] = tile;
        true
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, &tile)| (Cell::new(idx / cols, idx % cols), tile))
    }

    /// Copy with every eaten pellet restored, suitable as a reset source.
    pub fn canonical(&self) -> Self {
        let tiles = self
            .tiles
            .iter()
            .map(|&tile| match tile {
                Tile::Consumed => Tile::Pellet,
                other => other,
            })
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            tiles,
        }
    }
}

/// Loads a custom layout file into `grid`.
///
/// Every failure leaves the grid's previous layout untouched and is logged;
/// the error is still handed back so callers can surface it.
pub fn load_layout_file(grid: &mut Grid, path: &Path) -> Result<(), LayoutError> {
    let result = Layout::read_from(path).and_then(|layout| grid.load_layout(layout));
    match &result {
        Ok(()) => info!("Loaded custom layout from {}", path.display()),
        Err(err) => warn!("Keeping current layout, {} rejected: {}", path.display(), err),
    }
    result
}

pub fn save_layout(grid: &Grid, path: &Path) -> Result<(), LayoutError> {
    grid.layout().write_to(path)?;
    info!("Saved layout to {}", path.display());
    Ok(())
}
