//! Seeded maze generator producing an alternate canonical layout.
//!
//! Odd rows and columns form a lattice of rooms carved with randomized Prim,
//! then braided to remove most dead ends so pursuers can be outrun.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::agent::Dir;
use crate::grid::{Cell, Tile};
use crate::layout::Layout;

const BRAID_CHANCE: f32 = 0.45;
const EXTRA_OPENINGS: f32 = 0.08;
const DIRS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

#[derive(Clone, Copy)]
struct Lattice {
    rows: usize,
    cols: usize,
}

impl Lattice {
    fn index(self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    fn neighbors(self, cell: Cell) -> impl Iterator<Item = Cell> {
        DIRS.into_iter()
            .filter_map(move |dir| offset(cell, dir, self.rows, self.cols))
    }
}

/// Generates a `rows` x `cols` layout. Every cell in `keep_open` is carved
/// and the first one seeds the connectivity pass, so all open tiles are
/// reachable from it.
pub fn generate(seed: u64, rows: usize, cols: usize, keep_open: &[Cell]) -> Layout {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut layout = Layout::filled(rows, cols, Tile::Wall);
    let lattice = Lattice {
        rows: rows.saturating_sub(1) / 2,
        cols: cols.saturating_sub(1) / 2,
    };
    if lattice.rows > 0 && lattice.cols > 0 {
        carve_prim(&mut layout, lattice, &mut rng);
        braid(&mut layout, lattice, &mut rng);
    }

    for &cell in keep_open {
        if is_interior(cell, rows, cols) {
            layout.set(cell, Tile::Empty);
        }
    }
    let start = keep_open
        .iter()
        .copied()
        .find(|&cell| layout.get(cell) == Some(Tile::Empty))
        .or_else(|| {
            layout
                .cells()
                .find(|(_, tile)| *tile == Tile::Empty)
                .map(|(cell, _)| cell)
        });
    if let Some(start) = start {
        ensure_connected(&mut layout, start);
    }

    let open: Vec<Cell> = layout
        .cells()
        .filter(|(_, tile)| *tile == Tile::Empty)
        .map(|(cell, _)| cell)
        .collect();
    for cell in open {
        layout.set(cell, Tile::Pellet);
    }

    let power_spots = [
        Cell::new(1, cols.saturating_sub(2)),
        Cell::new(rows.saturating_sub(2), 1),
        Cell::new(rows.saturating_sub(2), cols.saturating_sub(2)),
        Cell::new((rows / 2) | 1, 1),
    ];
    for cell in power_spots {
        if keep_open.contains(&cell) {
            continue;
        }
        if layout.get(cell) == Some(Tile::Pellet) {
            layout.set(cell, Tile::PowerPellet);
        }
    }
    layout
}

fn room(cell: Cell) -> Cell {
    Cell::new(cell.row * 2 + 1, cell.col * 2 + 1)
}

fn carve_between(layout: &mut Layout, a: Cell, b: Cell) {
    let (ga, gb) = (room(a), room(b));
    layout.set(Cell::new((ga.row + gb.row) / 2, (ga.col + gb.col) / 2), Tile::Empty);
}

fn is_open_between(layout: &Layout, a: Cell, b: Cell) -> bool {
    let (ga, gb) = (room(a), room(b));
    layout.get(Cell::new((ga.row + gb.row) / 2, (ga.col + gb.col) / 2)) != Some(Tile::Wall)
}

fn carve_prim(layout: &mut Layout, lattice: Lattice, rng: &mut StdRng) {
    let mut in_maze = vec![false; lattice.rows * lattice.cols];
    let start = Cell::new(rng.gen_range(0..lattice.rows), rng.gen_range(0..lattice.cols));
    in_maze[lattice.index(start)] = true;
    layout.set(room(start), Tile::Empty);
    let mut frontier: Vec<Cell> = lattice.neighbors(start).collect();

    while !frontier.is_empty() {
        let idx = rng.gen_range(0..frontier.len());
        let cell = frontier.swap_remove(idx);
        if in_maze[lattice.index(cell)] {
            continue;
        }
        let joined: Vec<Cell> = lattice
            .neighbors(cell)
            .filter(|n| in_maze[lattice.index(*n)])
            .collect();
        let Some(&link) = joined.choose(rng) else {
            continue;
        };
        in_maze[lattice.index(cell)] = true;
        carve_between(layout, cell, link);
        layout.set(room(cell), Tile::Empty);
        frontier.extend(lattice.neighbors(cell).filter(|n| !in_maze[lattice.index(*n)]));
    }
}

fn braid(layout: &mut Layout, lattice: Lattice, rng: &mut StdRng) {
    for row in 0..lattice.rows {
        for col in 0..lattice.cols {
            let cell = Cell::new(row, col);
            let (open, closed): (Vec<Cell>, Vec<Cell>) = lattice
                .neighbors(cell)
                .partition(|n| is_open_between(layout, cell, *n));
            if closed.is_empty() {
                continue;
            }
            let dead_end = open.len() == 1;
            if (dead_end && rng.gen::<f32>() < BRAID_CHANCE) || rng.gen::<f32>() < EXTRA_OPENINGS {
                if let Some(&other) = closed.choose(rng) {
                    carve_between(layout, cell, other);
                    layout.set(room(other), Tile::Empty);
                }
            }
        }
    }
}

/// Knocks out single walls between the region reachable from `start` and
/// any stranded open tiles until nothing is stranded.
fn ensure_connected(layout: &mut Layout, start: Cell) {
    let (rows, cols) = layout.dimensions();
    for _ in 0..rows * cols {
        let reachable = flood(layout, start);
        let Some(wall) = bridging_wall(layout, &reachable) else {
            break;
        };
        layout.set(wall, Tile::Empty);
    }
}

fn bridging_wall(layout: &Layout, reachable: &[bool]) -> Option<Cell> {
    let (rows, cols) = layout.dimensions();
    for row in 1..rows.saturating_sub(1) {
        for col in 1..cols.saturating_sub(1) {
            let cell = Cell::new(row, col);
            if layout.get(cell) != Some(Tile::Wall) {
                continue;
            }
            let mut touches_reach = false;
            let mut touches_stranded = false;
            for next in DIRS.into_iter().filter_map(|dir| offset(cell, dir, rows, cols)) {
                if layout.get(next).map_or(true, Tile::is_wall) {
                    continue;
                }
                if reachable[next.row * cols + next.col] {
                    touches_reach = true;
                } else {
                    touches_stranded = true;
                }
            }
            if touches_reach && touches_stranded {
                return Some(cell);
            }
        }
    }
    None
}

fn flood(layout: &Layout, start: Cell) -> Vec<bool> {
    let (rows, cols) = layout.dimensions();
    let mut seen = vec![false; rows * cols];
    let mut queue = VecDeque::from([start]);
    seen[start.row * cols + start.col] = true;
    while let Some(cell) = queue.pop_front() {
        for next in DIRS.into_iter().filter_map(|dir| offset(cell, dir, rows, cols)) {
            let idx = next.row * cols + next.col;
            if seen[idx] || layout.get(next).map_or(true, Tile::is_wall) {
                continue;
            }
            seen[idx] = true;
            queue.push_back(next);
        }
    }
    seen
}

fn offset(cell: Cell, dir: Dir, rows: usize, cols: usize) -> Option<Cell> {
    let (dx, dy) = dir.delta();
    let row = cell.row.checked_add_signed(dy)?;
    let col = cell.col.checked_add_signed(dx)?;
    (row < rows && col < cols).then_some(Cell::new(row, col))
}

fn is_interior(cell: Cell, rows: usize, cols: usize) -> bool {
    cell.row > 0 && cell.col > 0 && cell.row + 1 < rows && cell.col + 1 < cols
}
