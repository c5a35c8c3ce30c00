/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// pixel coordinates into terminal cells and state into terminal commands.

use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use road_crossing::entities::{
    GameState, Popup, PopupKind, CHARACTERS, COLLECTIBLE_SPRITE, ENEMY_SPRITE, OBSTACLE_SPRITE,
};
use road_crossing::grid;

/// Terminal columns per board column.
const CELL_COLS: u16 = 10;
/// Terminal lines per board row.
const CELL_ROWS: u16 = 2;

const BOARD_LEFT: u16 = 1;
const BOARD_TOP: u16 = 2;
const BOARD_WIDTH: u16 = grid::COLUMNS as u16 * CELL_COLS;
const BOARD_HEIGHT: u16 = grid::ROWS as u16 * CELL_ROWS;

const POPUP_WIDTH: u16 = 34;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_POINTS: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_WATER: Color = Color::Blue;
const C_ROAD: Color = Color::DarkGrey;
const C_GRASS: Color = Color::DarkGreen;
const C_POPUP_BG: Color = Color::Black;
const C_POPUP_FG: Color = Color::White;

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct Glyph {
    pub text: &'static str,
    pub color: Color,
}

/// Sprite identifier → glyph.  Built once at start-up.
pub struct SpriteSheet {
    glyphs: HashMap<&'static str, Glyph>,
}

impl SpriteSheet {
    pub fn load() -> Self {
        let entries: [(&'static str, &'static str, Color); 8] = [
            (ENEMY_SPRITE, "<@@@@>", Color::Red),
            (OBSTACLE_SPRITE, "(####)", Color::Grey),
            (COLLECTIBLE_SPRITE, "<>", Color::DarkYellow),
            (CHARACTERS[0], "(o_o)", Color::White),
            (CHARACTERS[1], "=^.^=", Color::Magenta),
            (CHARACTERS[2], "\\o_o/", Color::Cyan),
            (
                CHARACTERS[3],
                "(^_^)",
                Color::Rgb {
                    r: 255,
                    g: 105,
                    b: 180,
                },
            ),
            (CHARACTERS[4], "<*_*>", Color::Yellow),
        ];
        let glyphs = entries
            .into_iter()
            .map(|(id, text, color)| (id, Glyph { text, color }))
            .collect();
        SpriteSheet { glyphs }
    }

    pub fn get(&self, id: &str) -> Option<&Glyph> {
        self.glyphs.get(id)
    }
}

/// Columns and lines the game needs to be fully visible.
pub fn required_size() -> (u16, u16) {
    (BOARD_LEFT + BOARD_WIDTH + 1, BOARD_TOP + BOARD_HEIGHT + 2)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sheet: &SpriteSheet,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, state)?;
    draw_border(out)?;
    draw_board(out)?;

    for item in &state.collectibles {
        draw_sprite(out, sheet, item.sprite, item.x, item.y)?;
    }
    for enemy in &state.enemies {
        draw_sprite(out, sheet, enemy.sprite(), enemy.x, enemy.y)?;
    }
    draw_sprite(out, sheet, state.player.sprite, state.player.x, state.player.y)?;

    draw_controls_hint(out)?;

    if let Some(popup) = &state.session.popup {
        draw_popup(out, popup, sheet)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, BOARD_TOP + BOARD_HEIGHT + 1))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(BOARD_LEFT, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_POINTS))?;
    out.queue(Print(format!("Points: {}", state.session.points)))?;

    let level = format!("Level {}/{}", state.session.level, state.config.max_level);
    let lx = (BOARD_LEFT + BOARD_WIDTH).saturating_sub(level.chars().count() as u16);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(level))?;
    Ok(())
}

// ── Board ─────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W) -> std::io::Result<()> {
    let w = BOARD_WIDTH as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(BOARD_LEFT - 1, BOARD_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
    out.queue(cursor::MoveTo(BOARD_LEFT - 1, BOARD_TOP + BOARD_HEIGHT))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for line in BOARD_TOP..BOARD_TOP + BOARD_HEIGHT {
        out.queue(cursor::MoveTo(BOARD_LEFT - 1, line))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(BOARD_LEFT + BOARD_WIDTH, line))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn background(row: u32) -> Color {
    if row < grid::FIRST_LANE {
        C_WATER
    } else if row <= grid::LAST_LANE {
        C_ROAD
    } else {
        C_GRASS
    }
}

fn draw_board<W: Write>(out: &mut W) -> std::io::Result<()> {
    let blank = " ".repeat(BOARD_WIDTH as usize);
    for row in 0..grid::ROWS {
        out.queue(style::SetBackgroundColor(background(row)))?;
        for sub in 0..CELL_ROWS {
            out.queue(cursor::MoveTo(BOARD_LEFT, BOARD_TOP + row as u16 * CELL_ROWS + sub))?;
            out.queue(Print(&blank))?;
        }
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

/// Draw a sprite whose top-left corner is at pixel `(x, y)`, centred in its
/// cell and clipped to the board.  Unknown ids are skipped.
fn draw_sprite<W: Write>(
    out: &mut W,
    sheet: &SpriteSheet,
    id: &str,
    x: f32,
    y: f32,
) -> std::io::Result<()> {
    let Some(glyph) = sheet.get(id) else {
        return Ok(());
    };

    let row = grid::row_of(y).round().clamp(0.0, (grid::ROWS - 1) as f32) as u32;
    let line = BOARD_TOP + row as u16 * CELL_ROWS + CELL_ROWS / 2;

    let width = glyph.text.chars().count() as i32;
    let offset = (CELL_COLS as i32 - width) / 2;
    let start = (grid::column_of(x) * CELL_COLS as f32).round() as i32 + offset;

    let visible: String = glyph
        .text
        .chars()
        .enumerate()
        .filter(|(i, _)| (0..BOARD_WIDTH as i32).contains(&(start + *i as i32)))
        .map(|(_, c)| c)
        .collect();
    if visible.is_empty() {
        return Ok(());
    }

    let col = BOARD_LEFT + start.max(0) as u16;
    out.queue(cursor::MoveTo(col, line))?;
    out.queue(style::SetBackgroundColor(background(row)))?;
    out.queue(style::SetForegroundColor(glyph.color))?;
    out.queue(Print(visible))?;
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Popup ─────────────────────────────────────────────────────────────────────

fn draw_popup<W: Write>(out: &mut W, popup: &Popup, sheet: &SpriteSheet) -> std::io::Result<()> {
    let inner = POPUP_WIDTH as usize - 2;
    let centre = |text: &str| {
        let len = text.chars().count().min(inner);
        let left = (inner - len) / 2;
        format!(
            "│{}{}{}│",
            " ".repeat(left),
            text.chars().take(inner).collect::<String>(),
            " ".repeat(inner - len - left)
        )
    };

    let mut lines = vec![
        format!("┌{}┐", "─".repeat(inner)),
        centre(&popup.title),
        centre(""),
        centre(&popup.message),
    ];
    if let PopupKind::CharacterSelect { index } = popup.kind {
        let id = CHARACTERS[index % CHARACTERS.len()];
        let face = sheet.get(id).map(|g| g.text).unwrap_or(id);
        lines.push(centre(""));
        lines.push(centre(&format!("<   {face}   >")));
    }
    lines.push(centre(""));
    lines.push(centre("[ Enter ] OK"));
    lines.push(format!("└{}┘", "─".repeat(inner)));

    let left = BOARD_LEFT + (BOARD_WIDTH.saturating_sub(POPUP_WIDTH)) / 2;
    let top = BOARD_TOP + (BOARD_HEIGHT.saturating_sub(lines.len() as u16)) / 2;

    out.queue(style::SetBackgroundColor(C_POPUP_BG))?;
    out.queue(style::SetForegroundColor(C_POPUP_FG))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(left, top + i as u16))?;
        out.queue(Print(line))?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(BOARD_LEFT, BOARD_TOP + BOARD_HEIGHT + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←↑→↓ / WASD : Move   C : Character   Q : Quit"))?;
    Ok(())
}
