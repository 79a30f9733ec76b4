use std::time::Duration;

use crate::collision::Bounds;
use crate::grid::{Cell, Grid};
use crate::strategy::{Patrol, Strategy};
use crate::BLOCK_SIZE;

pub const POWER_DURATION: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Dir::Left | Dir::Right)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }
}

/// Position, extent and heading shared by every moving agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub dir: Dir,
    pub speed: f32,
}

impl Body {
    /// A block-sized body resting on `cell`.
    pub fn at_cell(cell: Cell, dir: Dir, speed: f32) -> Self {
        let (x, y) = cell.origin();
        Self {
            x,
            y,
            width: BLOCK_SIZE,
            height: BLOCK_SIZE,
            dir,
            speed,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Grid cell under the top-left corner, clamped into the grid.
    pub fn cell(&self, grid: &Grid) -> Cell {
        grid.clamp_cell(
            (self.y / BLOCK_SIZE).floor() as i64,
            (self.x / BLOCK_SIZE).floor() as i64,
        )
    }

    pub fn teleport(&mut self, cell: Cell) {
        let (x, y) = cell.origin();
        self.x = x;
        self.y = y;
    }

    /// True when the body sits exactly on a row lane.
    pub fn is_row_aligned(&self) -> bool {
        on_lane(self.y)
    }

    /// True when the body sits exactly on a column lane.
    pub fn is_col_aligned(&self) -> bool {
        on_lane(self.x)
    }
}

fn on_lane(v: f32) -> bool {
    (v % BLOCK_SIZE).abs() < 1e-3
}

/// Power mode with a refresh-on-reactivate expiry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerMode {
    active: bool,
    expires_at: Duration,
}

impl PowerMode {
    pub fn activate(&mut self, now: Duration) {
        self.active = true;
        self.expires_at = now + POWER_DURATION;
    }

    /// Clears the flag once `now` is strictly past the expiry. Returns true
    /// on the call that turned power mode off.
    pub fn update(&mut self, now: Duration) -> bool {
        if self.active && now > self.expires_at {
            self.active = false;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn expires_at(&self) -> Option<Duration> {
        self.active.then_some(self.expires_at)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub next_dir: Dir,
    pub power: PowerMode,
}

impl Player {
    pub fn new(spawn: Cell, speed: f32) -> Self {
        Self {
            body: Body::at_cell(spawn, Dir::Right, speed),
            next_dir: Dir::Right,
            power: PowerMode::default(),
        }
    }

    pub fn request_direction(&mut self, dir: Dir) {
        self.next_dir = dir;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pursuer {
    pub body: Body,
    pub spawn: Cell,
    /// Detection range in grid cells.
    pub range: u32,
    pub strategy: Strategy,
    pub target: Cell,
    pub patrol: Patrol,
}

impl Pursuer {
    pub fn new(spawn: Cell, speed: f32, range: u32, patrol: Patrol) -> Self {
        Self {
            body: Body::at_cell(spawn, Dir::Right, speed),
            spawn,
            range,
            strategy: Strategy::Patrol,
            target: spawn,
            patrol,
        }
    }

    /// Sends the pursuer home after being eaten; targeting state survives.
    pub fn respawn(&mut self) {
        self.body.teleport(self.spawn);
    }
}
