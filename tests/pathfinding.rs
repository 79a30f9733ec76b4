use std::collections::VecDeque;

use maze_chase::pathfinder::{self, WallMask};
use maze_chase::{Cell, Dir, Grid, Layout, Tile};
use proptest::prelude::*;

fn mask_from(text: &str) -> WallMask {
    WallMask::from_grid(&Grid::new(Layout::parse(text).unwrap()))
}

fn step(cell: Cell, dir: Dir) -> Cell {
    let (dx, dy) = dir.delta();
    Cell::new(
        cell.row.checked_add_signed(dy).unwrap(),
        cell.col.checked_add_signed(dx).unwrap(),
    )
}

/// Plain BFS distance used as the reference.
fn reference_distance(open: &[Vec<bool>], from: Cell, to: Cell) -> Option<usize> {
    let rows = open.len();
    let cols = open[0].len();
    let mut dist = vec![vec![None; cols]; rows];
    dist[from.row][from.col] = Some(0usize);
    let mut queue = VecDeque::from([from]);
    while let Some(cell) = queue.pop_front() {
        let d = dist[cell.row][cell.col].unwrap();
        if cell == to {
            return Some(d);
        }
        let candidates = [
            (cell.row.wrapping_sub(1), cell.col),
            (cell.row + 1, cell.col),
            (cell.row, cell.col.wrapping_sub(1)),
            (cell.row, cell.col + 1),
        ];
        for (r, c) in candidates {
            if r < rows && c < cols && open[r][c] && dist[r][c].is_none() {
                dist[r][c] = Some(d + 1);
                queue.push_back(Cell::new(r, c));
            }
        }
    }
    None
}

#[test]
fn same_cell_keeps_current_heading() {
    let mask = mask_from("1 1 1\n1 0 1\n1 1 1");
    let here = Cell::new(1, 1);
    assert_eq!(pathfinder::find_path(&mask, here, here), Some(Vec::new()));
    assert_eq!(pathfinder::next_direction(&mask, here, here, Dir::Down), Dir::Down);
}

#[test]
fn corridor_replanning_reaches_the_end() {
    let mask = mask_from("1 1 1 1 1\n0 0 0 0 0\n1 1 1 1 1");
    let dest = Cell::new(1, 4);
    let mut at = Cell::new(1, 0);
    assert_eq!(pathfinder::next_direction(&mask, at, dest, Dir::Left), Dir::Right);
    for _ in 0..4 {
        let dir = pathfinder::next_direction(&mask, at, dest, Dir::Left);
        at = step(at, dir);
    }
    assert_eq!(at, dest);
}

#[test]
fn every_builtin_pellet_is_reachable_from_spawn() {
    let grid = Grid::new(Layout::builtin());
    let mask = WallMask::from_grid(&grid);
    let spawn = Cell::new(1, 1);
    for (cell, tile) in grid.tiles() {
        if matches!(tile, Tile::Pellet | Tile::PowerPellet) {
            assert!(
                pathfinder::distance(&mask, spawn, cell).is_some(),
                "{cell:?} unreachable"
            );
        }
    }
}

fn arb_maze() -> impl Strategy<Value = (Vec<Vec<bool>>, Cell, Cell)> {
    (2usize..9, 2usize..9).prop_flat_map(|(rows, cols)| {
        (
            prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.7), cols), rows),
            (0..rows, 0..cols),
            (0..rows, 0..cols),
        )
            .prop_map(|(mut open, (r0, c0), (r1, c1))| {
                open[r0][c0] = true;
                open[r1][c1] = true;
                (open, Cell::new(r0, c0), Cell::new(r1, c1))
            })
    })
}

fn layout_from(open: &[Vec<bool>]) -> Layout {
    let rows = open
        .iter()
        .map(|row| {
            row.iter()
                .map(|&o| if o { Tile::Empty } else { Tile::Wall })
                .collect()
        })
        .collect();
    Layout::from_rows(rows).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn path_length_matches_reference_bfs((open, origin, dest) in arb_maze()) {
        let grid = Grid::new(layout_from(&open));
        let mask = WallMask::from_grid(&grid);
        let expected = reference_distance(&open, origin, dest);
        let path = pathfinder::find_path(&mask, origin, dest);
        prop_assert_eq!(path.as_ref().map(Vec::len), expected);

        if let Some(path) = path {
            let mut at = origin;
            for dir in path {
                at = step(at, dir);
                prop_assert!(!mask.is_blocked(at));
            }
            prop_assert_eq!(at, dest);
        }
    }

    #[test]
    fn replanning_each_step_takes_a_shortest_route((open, origin, dest) in arb_maze()) {
        let mask = WallMask::from_grid(&Grid::new(layout_from(&open)));
        let Some(expected) = reference_distance(&open, origin, dest) else {
            prop_assert_eq!(pathfinder::next_direction(&mask, origin, dest, Dir::Up), Dir::Up);
            return Ok(());
        };
        let mut at = origin;
        for _ in 0..expected {
            let dir = pathfinder::next_direction(&mask, at, dest, Dir::Up);
            let next = step(at, dir);
            prop_assert_eq!(
                reference_distance(&open, next, dest),
                reference_distance(&open, at, dest).map(|d| d - 1)
            );
            at = next;
        }
        prop_assert_eq!(at, dest);
    }

    #[test]
    fn search_is_deterministic((open, origin, dest) in arb_maze()) {
        let mask = WallMask::from_grid(&Grid::new(layout_from(&open)));
        let before = mask.clone();
        let first = pathfinder::find_path(&mask, origin, dest);
        let second = pathfinder::find_path(&mask, origin, dest);
        prop_assert_eq!(first, second);
        prop_assert_eq!(mask, before);
    }
}
