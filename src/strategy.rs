//! Per-tick targeting decision for pursuers: flee, chase or patrol.

use std::time::Duration;

use crate::agent::{Player, Pursuer};
use crate::grid::{Cell, Grid};

/// Minimum time a pursuer keeps heading for one patrol waypoint.
pub const PATROL_DWELL: Duration = Duration::from_secs(10);

const WAYPOINT_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Chase,
    Flee,
    Patrol,
}

/// Round-robin cursor over the patrol waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Patrol {
    index: usize,
    last_rotation: Duration,
}

impl Patrol {
    pub fn new(index: usize, now: Duration) -> Self {
        Self {
            index: index % WAYPOINT_COUNT,
            last_rotation: now,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves to the next waypoint once the dwell time has passed.
    pub fn rotate_if_due(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_rotation) < PATROL_DWELL {
            return false;
        }
        self.index = (self.index + 1) % WAYPOINT_COUNT;
        self.last_rotation = now;
        true
    }

    pub fn waypoint(&self, grid: &Grid) -> Cell {
        waypoints(grid)[self.index]
    }
}

/// The four interior map corners, in patrol order.
pub fn waypoints(grid: &Grid) -> [Cell; WAYPOINT_COUNT] {
    let far_row = grid.rows() as i64 - 2;
    let far_col = grid.cols() as i64 - 2;
    [
        grid.clamp_cell(1, 1),
        grid.clamp_cell(far_row, 1),
        grid.clamp_cell(1, far_col),
        grid.clamp_cell(far_row, far_col),
    ]
}

/// Strict precedence: power mode forces Flee, then range decides Chase,
/// otherwise Patrol. Nothing carries over between ticks.
pub fn select(pursuer: &Pursuer, player: &Player, grid: &Grid) -> Strategy {
    if player.power.is_active() {
        return Strategy::Flee;
    }
    let distance = cell_distance(pursuer.body.cell(grid), player.body.cell(grid));
    if distance <= pursuer.range as f32 {
        Strategy::Chase
    } else {
        Strategy::Patrol
    }
}

pub fn target_cell(strategy: Strategy, pursuer: &Pursuer, player: &Player, grid: &Grid) -> Cell {
    match strategy {
        Strategy::Flee => flee_corner(player, grid),
        Strategy::Chase => player.body.cell(grid),
        Strategy::Patrol => pursuer.patrol.waypoint(grid),
    }
}

/// Corner diagonally away from the half of the map the player is in.
fn flee_corner(player: &Player, grid: &Grid) -> Cell {
    let far_row = grid.rows() as i64 - 2;
    let far_col = grid.cols() as i64 - 2;
    let col = if player.body.x < grid.world_width() / 2.0 {
        far_col
    } else {
        1
    };
    let row = if player.body.y < grid.world_height() / 2.0 {
        far_row
    } else {
        1
    };
    grid.clamp_cell(row, col)
}

fn cell_distance(a: Cell, b: Cell) -> f32 {
    let dr = a.row.abs_diff(b.row) as f32;
    let dc = a.col.abs_diff(b.col) as f32;
    (dr * dr + dc * dc).sqrt()
}
