/// Random non-overlapping placement on the road lanes.
///
/// Candidates are sampled at random and rejected while another enemy or
/// collectible sits on exactly the same coordinate.  After
/// `MAX_PLACEMENT_ATTEMPTS` rejections the finite candidate set is scanned
/// in row-major order instead, so placement always terminates.

use log::{debug, warn};
use rand::Rng;

use crate::entities::GameState;
use crate::grid;

pub const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Where a new entity should appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
    /// Any lane cell.  Used when a level is set up.
    Initial,
    /// One cell off the left edge of a random lane, for a roaming enemy
    /// that just left the screen.
    Reentry,
}

/// Exact-coordinate scan of enemies, then collectibles.  Movement is
/// continuous so this only prevents stacking at placement time.
pub fn position_occupied(state: &GameState, x: f32, y: f32) -> bool {
    state.enemies.iter().any(|e| e.x == x && e.y == y)
        || state.collectibles.iter().any(|c| c.x == x && c.y == y)
}

fn sample(spawn: Spawn, rng: &mut impl Rng) -> (f32, f32) {
    let row = rng.gen_range(grid::lanes());
    let x = match spawn {
        Spawn::Initial => grid::column_x(rng.gen_range(0..grid::COLUMNS)),
        Spawn::Reentry => -grid::CELL_WIDTH,
    };
    (x, grid::row_y(row))
}

fn candidates(spawn: Spawn) -> Vec<(f32, f32)> {
    match spawn {
        Spawn::Initial => grid::lane_cells().collect(),
        Spawn::Reentry => grid::lanes()
            .map(|row| (-grid::CELL_WIDTH, grid::row_y(row)))
            .collect(),
    }
}

/// First free candidate in row-major order.
pub fn first_free_cell(state: &GameState, spawn: Spawn) -> Option<(f32, f32)> {
    candidates(spawn)
        .into_iter()
        .find(|&(x, y)| !position_occupied(state, x, y))
}

/// Pick an unoccupied coordinate for a new or repositioned entity.
///
/// If every candidate is taken the last random sample is returned and
/// the overlap is logged; callers never loop.
pub fn find_position(state: &GameState, spawn: Spawn, rng: &mut impl Rng) -> (f32, f32) {
    let mut last = sample(spawn, rng);
    for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
        if attempt > 0 {
            last = sample(spawn, rng);
        }
        if !position_occupied(state, last.0, last.1) {
            return last;
        }
    }

    debug!("random placement exhausted after {MAX_PLACEMENT_ATTEMPTS} attempts, scanning");
    match first_free_cell(state, spawn) {
        Some(cell) => cell,
        None => {
            warn!("no free {spawn:?} cell left, overlapping at {last:?}");
            last
        }
    }
}

/// A roaming enemy speed in pixels per second.
pub fn random_speed(state: &GameState, rng: &mut impl Rng) -> f32 {
    rng.gen_range(state.config.speed_min..state.config.speed_max) as f32
}
