//! Breadth-first shortest-path search that steers pursuers.

use std::collections::VecDeque;

use crate::agent::Dir;
use crate::grid::{Cell, Grid};

/// Neighbor expansion order. Decides the first step among equal-length paths.
const EXPANSION_ORDER: [Dir; 4] = [Dir::Left, Dir::Right, Dir::Up, Dir::Down];

/// Passability snapshot of a grid. Only walls block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallMask {
    rows: usize,
    cols: usize,
    blocked: Vec<bool>,
}

impl WallMask {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            blocked: grid.tiles().map(|(_, tile)| tile.is_wall()).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.index(cell).map_or(true, |idx| self.blocked[idx])
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols).then(|| cell.row * self.cols + cell.col)
    }

    fn neighbor(&self, cell: Cell, dir: Dir) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let row = cell.row.checked_add_signed(dy)?;
        let col = cell.col.checked_add_signed(dx)?;
        (row < self.rows && col < self.cols).then_some(Cell::new(row, col))
    }
}

/// Search frontier entry. `parent` indexes into the node arena so each path
/// shares its prefix instead of copying it.
struct PathNode {
    cell: Cell,
    parent: Option<usize>,
    via: Option<Dir>,
}

/// Shortest 4-connected move sequence from `origin` to `dest`, or `None`
/// when `dest` cannot be reached. An empty path means `origin == dest`.
pub fn find_path(mask: &WallMask, origin: Cell, dest: Cell) -> Option<Vec<Dir>> {
    let origin_idx = mask.index(origin)?;
    mask.index(dest)?;

    // Private copy; visited cells are overwritten as blocked.
    let mut open: Vec<bool> = mask.blocked.iter().map(|blocked| !blocked).collect();
    open[origin_idx] = false;

    let mut nodes = vec![PathNode {
        cell: origin,
        parent: None,
        via: None,
    }];
    let mut queue = VecDeque::from([0usize]);

    while let Some(current) = queue.pop_front() {
        let cell = nodes[current].cell;
        if cell == dest {
            return Some(unwind(&nodes, current));
        }
        for dir in EXPANSION_ORDER {
            let Some(next) = mask.neighbor(cell, dir) else {
                continue;
            };
            let Some(idx) = mask.index(next) else {
                continue;
            };
            if !open[idx] {
                continue;
            }
            open[idx] = false;
            nodes.push(PathNode {
                cell: next,
                parent: Some(current),
                via: Some(dir),
            });
            queue.push_back(nodes.len() - 1);
        }
    }
    None
}

fn unwind(nodes: &[PathNode], mut idx: usize) -> Vec<Dir> {
    let mut moves = Vec::new();
    while let Some(parent) = nodes[idx].parent {
        if let Some(dir) = nodes[idx].via {
            moves.push(dir);
        }
        idx = parent;
    }
    moves.reverse();
    moves
}

/// First step toward `dest`. Falls back to `current` when already there or
/// when no path exists.
pub fn next_direction(mask: &WallMask, origin: Cell, dest: Cell, current: Dir) -> Dir {
    find_path(mask, origin, dest)
        .and_then(|path| path.first().copied())
        .unwrap_or(current)
}

/// Length of the shortest path, if any.
pub fn distance(mask: &WallMask, origin: Cell, dest: Cell) -> Option<usize> {
    find_path(mask, origin, dest).map(|path| path.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn mask(text: &str) -> WallMask {
        WallMask::from_grid(&Grid::new(Layout::parse(text).unwrap()))
    }

    #[test]
    fn same_cell_keeps_current_direction() {
        let mask = mask("1 1 1\n1 0 1\n1 1 1");
        let here = Cell::new(1, 1);
        assert_eq!(find_path(&mask, here, here), Some(Vec::new()));
        assert_eq!(next_direction(&mask, here, here, Dir::Down), Dir::Down);
    }

    #[test]
    fn corridor_heads_right() {
        let mask = mask("1 1 1 1 1\n0 0 0 0 0\n1 1 1 1 1");
        let path = find_path(&mask, Cell::new(1, 0), Cell::new(1, 4)).unwrap();
        assert_eq!(path, vec![Dir::Right; 4]);
    }

    #[test]
    fn enclosed_origin_fails_soft() {
        let mask = mask("0 0 0 0 0\n0 1 1 1 0\n0 1 0 1 0\n0 1 1 1 0\n0 0 0 0 0");
        let origin = Cell::new(2, 2);
        assert_eq!(find_path(&mask, origin, Cell::new(0, 0)), None);
        assert_eq!(
            next_direction(&mask, origin, Cell::new(0, 0), Dir::Up),
            Dir::Up
        );
    }

    #[test]
    fn wall_or_outside_destination_is_unreachable() {
        let mask = mask("0 0 0\n0 1 0\n0 0 0");
        assert_eq!(find_path(&mask, Cell::new(0, 0), Cell::new(1, 1)), None);
        assert_eq!(find_path(&mask, Cell::new(0, 0), Cell::new(7, 1)), None);
        assert_eq!(
            next_direction(&mask, Cell::new(0, 0), Cell::new(1, 1), Dir::Left),
            Dir::Left
        );
    }

    #[test]
    fn ties_break_left_right_up_down() {
        let mask = mask("0 0 0\n0 0 0\n0 0 0");
        // Both Left-then-Up and Up-then-Left are two moves long.
        assert_eq!(
            find_path(&mask, Cell::new(1, 1), Cell::new(0, 0)),
            Some(vec![Dir::Left, Dir::Up])
        );
        assert_eq!(
            find_path(&mask, Cell::new(1, 1), Cell::new(2, 2)),
            Some(vec![Dir::Right, Dir::Down])
        );
    }

    #[test]
    fn routes_around_obstacles() {
        let mask = mask("0 0 0 0\n1 1 1 0\n0 0 0 0");
        let path = find_path(&mask, Cell::new(0, 0), Cell::new(2, 0)).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path[0], Dir::Right);
        assert_eq!(distance(&mask, Cell::new(0, 0), Cell::new(2, 0)), Some(8));
    }

    #[test]
    fn search_does_not_touch_the_mask() {
        let mask = mask("0 0 0\n0 1 0\n0 0 0");
        let before = mask.clone();
        let _ = find_path(&mask, Cell::new(0, 0), Cell::new(2, 2));
        assert_eq!(mask, before);
    }
}
