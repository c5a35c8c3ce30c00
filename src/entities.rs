/// All game entity types — pure data, no logic.

use crate::config::GameConfig;

/// Player sprites offered by the character select popup.
pub const CHARACTERS: [&str; 5] = [
    "char-boy",
    "char-cat-girl",
    "char-horn-girl",
    "char-pink-girl",
    "char-princess-girl",
];

pub const ENEMY_SPRITE: &str = "enemy-bug";
pub const OBSTACLE_SPRITE: &str = "rock";
pub const COLLECTIBLE_SPRITE: &str = "gem-orange";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse an input token.  Anything unrecognised yields `None`, which
    /// callers treat as "do nothing".
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

// ── Enemies & collectibles ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyKind {
    /// Crosses the road left to right at `speed` pixels per second.
    Roaming { speed: f32 },
    /// A rock.  Never moves and blocks the player instead of hurting them.
    Static,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub padding: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub const WIDTH: f32 = 99.0;
    pub const PADDING: f32 = 1.0;

    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        Enemy {
            x,
            y,
            width: Self::WIDTH,
            padding: Self::PADDING,
            kind,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.kind == EnemyKind::Static
    }

    pub fn sprite(&self) -> &'static str {
        match self.kind {
            EnemyKind::Roaming { .. } => ENEMY_SPRITE,
            EnemyKind::Static => OBSTACLE_SPRITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub x: f32,
    pub y: f32,
    pub points: i64,
    pub sprite: &'static str,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Phase of the victory jump.  `Ascending` moves y towards the upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpPhase {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpBounds {
    pub min_y: f32,
    pub max_y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub padding: f32,
    pub sprite: &'static str,
    pub won: bool,
    pub phase: JumpPhase,
    /// Captured on the first jump tick after winning.
    pub jump: Option<JumpBounds>,
}

impl Player {
    pub const WIDTH: f32 = 65.0;
    pub const PADDING: f32 = 18.0;
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum PopupKind {
    /// Dismissing it starts a fresh game.
    Victory,
    /// `index` into `CHARACTERS`; applied to the player on dismissal.
    CharacterSelect { index: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub kind: PopupKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub level: u32,
    pub points: i64,
    pub collision_detected: bool,
    /// The one modal currently on screen, if any.
    pub popup: Option<Popup>,
}

impl Session {
    pub fn popup_visible(&self) -> bool {
        self.popup.is_some()
    }
}

/// Work postponed until the simulation clock reaches `due`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    ResetPlayer,
    ShowVictoryPopup,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deferred {
    pub due: f64,
    pub action: DeferredAction,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
    pub session: Session,
    /// Fire-once actions, in scheduling order.
    pub pending: Vec<Deferred>,
    /// Seconds of simulated time since the state was created.
    pub clock: f64,
    pub config: GameConfig,
}
