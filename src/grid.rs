/// Board geometry — row/column indices to pixel coordinates and back.
///
/// The board is 4 columns by 6 rows.  Row 0 is the water (win region),
/// rows 1..=3 are the road lanes, rows 4 and 5 are grass; the player
/// starts on row 5.  Sprites are drawn `SPRITE_PADDING` pixels above the
/// top of their row so they sit visually centred on the tile.

use std::ops::RangeInclusive;

pub const CELL_WIDTH: f32 = 101.0;
pub const CELL_HEIGHT: f32 = 83.0;
pub const SPRITE_PADDING: f32 = 20.0;

pub const COLUMNS: u32 = 4;
pub const ROWS: u32 = 6;
pub const FIRST_LANE: u32 = 1;
pub const LAST_LANE: u32 = 3;

pub const START_COLUMN: u32 = 2;
pub const START_ROW: u32 = 5;

pub fn column_x(col: u32) -> f32 {
    col as f32 * CELL_WIDTH
}

pub fn row_y(row: u32) -> f32 {
    row as f32 * CELL_HEIGHT - SPRITE_PADDING
}

/// Fractional column for a pixel x (enemies move continuously).
pub fn column_of(x: f32) -> f32 {
    x / CELL_WIDTH
}

/// Fractional row for a pixel y.
pub fn row_of(y: f32) -> f32 {
    (y + SPRITE_PADDING) / CELL_HEIGHT
}

/// Rightmost x the player may occupy.
pub fn max_x() -> f32 {
    column_x(COLUMNS - 1)
}

/// Lowest y the player may occupy (the start row).
pub fn max_y() -> f32 {
    row_y(START_ROW)
}

/// Topmost y the player may occupy (inside the win region).
pub fn min_y() -> f32 {
    -SPRITE_PADDING
}

/// Width of the drawable area; a roaming enemy past this is off-screen.
pub fn visible_width() -> f32 {
    COLUMNS as f32 * CELL_WIDTH
}

pub fn clamp_x(x: f32) -> f32 {
    x.clamp(0.0, max_x())
}

pub fn clamp_y(y: f32) -> f32 {
    y.clamp(min_y(), max_y())
}

/// Rows enemies and collectibles may occupy.
pub fn lanes() -> RangeInclusive<u32> {
    FIRST_LANE..=LAST_LANE
}

pub fn start_position() -> (f32, f32) {
    (column_x(START_COLUMN), row_y(START_ROW))
}

/// Every lane cell in row-major order.
pub fn lane_cells() -> impl Iterator<Item = (f32, f32)> {
    lanes().flat_map(|row| (0..COLUMNS).map(move |col| (column_x(col), row_y(row))))
}

/// Number of cells available for placement on the road.
pub fn lane_capacity() -> usize {
    lanes().count() * COLUMNS as usize
}

/// Whether `y` is exactly one of the lane rows.
pub fn is_lane_y(y: f32) -> bool {
    lanes().any(|row| row_y(row) == y)
}
