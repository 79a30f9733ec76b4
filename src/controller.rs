use std::time::Duration;

use tracing::trace;

use crate::agent::{Body, Dir, Player, Pursuer};
use crate::grid::Grid;
use crate::motion;
use crate::pathfinder::{self, WallMask};
use crate::strategy::{self, Strategy};

/// Player tick: try the buffered turn, then step forward (stalling on walls).
pub fn drive_player(player: &mut Player, grid: &Grid) -> bool {
    if player.next_dir != player.body.dir {
        motion::try_turn(&mut player.body, player.next_dir, grid);
    }
    motion::advance(&mut player.body, grid)
}

/// Pursuer tick: pick a strategy and target, plan one step, then move.
///
/// A planned heading that would collide is dropped and the pursuer keeps its
/// previous course for this tick.
pub fn steer_pursuer(
    pursuer: &mut Pursuer,
    player: &Player,
    grid: &Grid,
    mask: &WallMask,
    now: Duration,
) -> Strategy {
    let chosen = strategy::select(pursuer, player, grid);
    if chosen == Strategy::Patrol {
        pursuer.patrol.rotate_if_due(now);
    }
    pursuer.strategy = chosen;
    pursuer.target = strategy::target_cell(chosen, pursuer, player, grid);

    let origin = pursuer.body.cell(grid);
    let planned = pathfinder::next_direction(mask, origin, pursuer.target, pursuer.body.dir);
    let heading = align_to_lane(&pursuer.body, planned);
    if !motion::try_turn(&mut pursuer.body, heading, grid) {
        trace!(?heading, kept = ?pursuer.body.dir, "pursuer turn blocked");
    }
    motion::advance(&mut pursuer.body, grid);
    chosen
}

/// Keeps a body on its lane: a turn across the lane is postponed until the
/// body is aligned with the crossing row or column.
fn align_to_lane(body: &Body, wanted: Dir) -> Dir {
    if wanted.is_horizontal() && !body.is_row_aligned() {
        return if body.dir.is_vertical() { body.dir } else { Dir::Up };
    }
    if wanted.is_vertical() && !body.is_col_aligned() {
        return if body.dir.is_horizontal() { body.dir } else { Dir::Left };
    }
    wanted
}
