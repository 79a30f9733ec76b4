//! Direction-quantized stepping with speculative apply and rollback.

use crate::agent::{Body, Dir};
use crate::collision;
use crate::grid::Grid;

/// Moves `body` by its speed along its heading, then clamps the box into the
/// world extent of `grid`.
pub fn step_forward(body: &mut Body, grid: &Grid) {
    let (dx, dy) = body.dir.delta();
    body.x += dx as f32 * body.speed;
    body.y += dy as f32 * body.speed;
    body.x = body.x.clamp(0.0, (grid.world_width() - body.width).max(0.0));
    body.y = body.y.clamp(0.0, (grid.world_height() - body.height).max(0.0));
}

/// Exact inverse displacement of an unclamped [`step_forward`].
pub fn step_backward(body: &mut Body) {
    let (dx, dy) = body.dir.delta();
    body.x -= dx as f32 * body.speed;
    body.y -= dy as f32 * body.speed;
}

/// Applies `change` to `body` and keeps it only if the result is collision
/// free; otherwise the body is restored to its exact prior state.
pub fn speculate<F>(body: &mut Body, grid: &Grid, change: F) -> bool
where
    F: FnOnce(&mut Body, &Grid),
{
    let snapshot = *body;
    change(body, grid);
    if collision::collides(&body.bounds(), grid) {
        *body = snapshot;
        return false;
    }
    true
}

/// One forward step along the current heading; stalls against walls.
pub fn advance(body: &mut Body, grid: &Grid) -> bool {
    speculate(body, grid, step_forward)
}

/// Adopts `dir` only if a step that way would be legal. The position is never
/// changed; a rejected turn leaves the old heading in place.
pub fn try_turn(body: &mut Body, dir: Dir, grid: &Grid) -> bool {
    if body.dir == dir {
        return true;
    }
    let mut probe = *body;
    probe.dir = dir;
    if speculate(&mut probe, grid, step_forward) {
        body.dir = dir;
        true
    } else {
        false
    }
}
