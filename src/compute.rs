/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG and log
/// output.  Private `*_in` helpers mutate the fresh copy in place.

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Collectible, Deferred, DeferredAction, Direction, Enemy, EnemyKind, GameState, JumpBounds,
    JumpPhase, Player, Popup, PopupKind, Session, CHARACTERS, COLLECTIBLE_SPRITE,
};
use crate::grid;
use crate::placement::{self, Spawn};

/// Pixels shaved off each side of the player's box before testing overlap.
/// Applied to the player only; the enemy box is used as-is.
const OVERLAP_TOLERANCE: f32 = 4.0;

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn new_player() -> Player {
    let (x, y) = grid::start_position();
    Player {
        x,
        y,
        width: Player::WIDTH,
        padding: Player::PADDING,
        sprite: CHARACTERS[0],
        won: false,
        phase: JumpPhase::Ascending,
        jump: None,
    }
}

/// Build a fresh level-1 game.
pub fn init_state(config: GameConfig, rng: &mut impl Rng) -> GameState {
    let mut state = GameState {
        player: new_player(),
        enemies: Vec::new(),
        collectibles: Vec::new(),
        session: Session {
            level: 1,
            points: 0,
            collision_detected: false,
            popup: None,
        },
        pending: Vec::new(),
        clock: 0.0,
        config,
    };
    prepare_level_in(&mut state, rng);
    state
}

// ── Session ──────────────────────────────────────────────────────────────────

/// Add (or, with a negative delta, subtract) points.
pub fn add_points(state: &GameState, delta: i64) -> GameState {
    let mut next = state.clone();
    next.session.points += delta;
    next
}

pub fn reset_player(state: &GameState) -> GameState {
    let mut next = state.clone();
    reset_player_in(&mut next);
    next
}

fn reset_player_in(state: &mut GameState) {
    let (x, y) = grid::start_position();
    let player = &mut state.player;
    player.x = x;
    player.y = y;
    player.won = false;
    player.phase = JumpPhase::Ascending;
    player.jump = None;
    state.session.collision_detected = false;
}

/// Back to level 1 with no points and a freshly populated road.
pub fn reset_game(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    reset_game_in(&mut next, rng);
    next
}

fn reset_game_in(state: &mut GameState, rng: &mut impl Rng) {
    reset_player_in(state);
    state.session.level = 1;
    state.session.points = 0;
    state.enemies.clear();
    info!("game reset");
    prepare_level_in(state, rng);
}

// ── Level setup ──────────────────────────────────────────────────────────────

/// Populate the road for the current level.  Existing obstacles are moved
/// rather than rebuilt, then each entity count is brought to the level's plan.
pub fn prepare_level(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    prepare_level_in(&mut next, rng);
    next
}

fn prepare_level_in(state: &mut GameState, rng: &mut impl Rng) {
    state.collectibles.clear();

    let level = state.session.level;
    if level > 1 {
        for i in 0..state.enemies.len() {
            if state.enemies[i].is_blocking() {
                let (x, y) = placement::find_position(state, Spawn::Initial, rng);
                state.enemies[i].x = x;
                state.enemies[i].y = y;
            }
        }
    }

    let plan = state.config.plan_for(level);
    drop_excess(&mut state.enemies, false, plan.roaming);
    drop_excess(&mut state.enemies, true, plan.obstacles);

    let roaming = state.enemies.iter().filter(|e| !e.is_blocking()).count();
    for _ in roaming..plan.roaming {
        let speed = placement::random_speed(state, rng);
        let (x, y) = placement::find_position(state, Spawn::Initial, rng);
        state.enemies.push(Enemy::new(x, y, EnemyKind::Roaming { speed }));
    }

    let obstacles = state.enemies.iter().filter(|e| e.is_blocking()).count();
    for _ in obstacles..plan.obstacles {
        let (x, y) = placement::find_position(state, Spawn::Initial, rng);
        state.enemies.push(Enemy::new(x, y, EnemyKind::Static));
    }

    for _ in 0..plan.collectibles {
        let (x, y) = placement::find_position(state, Spawn::Initial, rng);
        state.collectibles.push(Collectible {
            x,
            y,
            points: state.config.collectible_points,
            sprite: COLLECTIBLE_SPRITE,
        });
    }

    debug!(
        "level {level} prepared: {} enemies, {} collectibles",
        state.enemies.len(),
        state.collectibles.len()
    );
}

/// Keep the first `target` enemies whose blocking flag matches `blocking`.
fn drop_excess(enemies: &mut Vec<Enemy>, blocking: bool, target: usize) {
    let mut kept = 0;
    enemies.retain(|e| {
        if e.is_blocking() != blocking {
            return true;
        }
        kept += 1;
        kept <= target
    });
}

// ── Input-driven state transitions ──────────────────────────────────────────

/// Move the player one cell.  Ignored while a popup is open or after the
/// final crossing.  A rock on the target cell cancels the move; a
/// collectible on it is picked up.
pub fn move_player(state: &GameState, direction: Direction, rng: &mut impl Rng) -> GameState {
    if state.session.popup_visible() || state.player.won {
        return state.clone();
    }

    let (dx, dy) = match direction {
        Direction::Up => (0.0, -grid::CELL_HEIGHT),
        Direction::Down => (0.0, grid::CELL_HEIGHT),
        Direction::Left => (-grid::CELL_WIDTH, 0.0),
        Direction::Right => (grid::CELL_WIDTH, 0.0),
    };
    let x = grid::clamp_x(state.player.x + dx);
    let y = grid::clamp_y(state.player.y + dy);

    if state
        .enemies
        .iter()
        .any(|e| e.is_blocking() && e.x == x && e.y == y)
    {
        debug!("move {direction:?} blocked at ({x}, {y})");
        return state.clone();
    }

    let mut next = state.clone();
    if let Some(i) = next.collectibles.iter().position(|c| c.x == x && c.y == y) {
        let item = next.collectibles.remove(i);
        next.session.points += item.points;
        info!("picked up {} for {} points", item.sprite, item.points);
    }

    next.player.x = x;
    next.player.y = y;
    check_win_in(&mut next, rng);
    next
}

/// Like `move_player`, but from a raw direction token.  Unknown tokens
/// leave the state untouched.
pub fn handle_input(state: &GameState, token: &str, rng: &mut impl Rng) -> GameState {
    match Direction::from_token(token) {
        Some(direction) => move_player(state, direction, rng),
        None => state.clone(),
    }
}

fn check_win_in(state: &mut GameState, rng: &mut impl Rng) {
    if state.player.y >= 0.0 {
        return;
    }

    state.session.points += state.config.win_bonus;

    if state.session.level >= state.config.max_level {
        info!("final level crossed with {} points", state.session.points);
        state.player.won = true;
        let delay = state.config.victory_delay;
        schedule(state, delay, DeferredAction::ShowVictoryPopup);
    } else {
        state.session.level += 1;
        info!("advancing to level {}", state.session.level);
        reset_player_in(state);
        prepare_level_in(state, rng);
    }
}

// ── Popups ───────────────────────────────────────────────────────────────────

/// Open `popup` unless another one is already showing.
pub fn show_popup(state: &GameState, popup: Popup) -> GameState {
    let mut next = state.clone();
    show_popup_in(&mut next, popup);
    next
}

fn show_popup_in(state: &mut GameState, popup: Popup) {
    if state.session.popup_visible() {
        debug!("popup {:?} suppressed, one is already open", popup.title);
        return;
    }
    state.session.popup = Some(popup);
}

fn victory_popup() -> Popup {
    Popup {
        title: "You Won!".to_string(),
        message: "Congratulations you won!".to_string(),
        kind: PopupKind::Victory,
    }
}

/// The OK action: close the popup and run whatever it was guarding.
pub fn dismiss_popup(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    let Some(popup) = next.session.popup.take() else {
        return next;
    };

    match popup.kind {
        PopupKind::Victory => reset_game_in(&mut next, rng),
        PopupKind::CharacterSelect { index } => {
            next.player.sprite = CHARACTERS[index % CHARACTERS.len()];
            info!("character changed to {}", next.player.sprite);
        }
    }
    next
}

pub fn open_character_select(state: &GameState) -> GameState {
    if state.player.won {
        return state.clone();
    }
    let index = CHARACTERS
        .iter()
        .position(|&c| c == state.player.sprite)
        .unwrap_or(0);
    show_popup(
        state,
        Popup {
            title: "Change Character".to_string(),
            message: "← → to browse, Enter to choose".to_string(),
            kind: PopupKind::CharacterSelect { index },
        },
    )
}

/// Step the highlighted character, wrapping at either end.
pub fn cycle_character(state: &GameState, forward: bool) -> GameState {
    let mut next = state.clone();
    if let Some(Popup {
        kind: PopupKind::CharacterSelect { index },
        ..
    }) = next.session.popup.as_mut()
    {
        let len = CHARACTERS.len();
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
    }
    next
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Whether `enemy` touches `player`.  Only roaming enemies in the player's
/// lane count.  Both boxes lie on one line, so testing whether either of
/// the enemy's edges falls inside the player's inset span is enough.
pub fn enemy_hits_player(enemy: &Enemy, player: &Player) -> bool {
    if enemy.is_blocking() || enemy.y != player.y {
        return false;
    }

    let min_x = player.x + player.padding + OVERLAP_TOLERANCE;
    let max_x = player.x + player.padding + player.width - OVERLAP_TOLERANCE;
    let span = min_x..=max_x;

    let nose = enemy.x + enemy.padding + enemy.width;
    let tail = enemy.x;
    span.contains(&nose) || span.contains(&tail)
}

fn detect_collision_in(state: &mut GameState) {
    if state.session.collision_detected {
        return;
    }
    if state
        .enemies
        .iter()
        .any(|e| enemy_hits_player(e, &state.player))
    {
        info!("collision at ({}, {})", state.player.x, state.player.y);
        state.session.collision_detected = true;
        let grace = state.config.collision_grace;
        schedule(state, grace, DeferredAction::ResetPlayer);
    }
}

// ── Deferred actions ─────────────────────────────────────────────────────────

fn schedule(state: &mut GameState, delay: f64, action: DeferredAction) {
    let due = state.clock + delay;
    debug!("scheduled {action:?} at t={due:.3}");
    state.pending.push(Deferred { due, action });
}

fn run_due_actions_in(state: &mut GameState) {
    let clock = state.clock;
    let (due, waiting): (Vec<Deferred>, Vec<Deferred>) =
        state.pending.drain(..).partition(|d| d.due <= clock);
    state.pending = waiting;

    for deferred in due {
        debug!("running {:?}", deferred.action);
        match deferred.action {
            DeferredAction::ResetPlayer => reset_player_in(state),
            DeferredAction::ShowVictoryPopup => show_popup_in(state, victory_popup()),
        }
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by `dt` seconds.  All randomness comes through
/// `rng` so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(state: &GameState, dt: f32, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.clock += f64::from(dt);

    // ── 1. Deferred actions whose time has come ──────────────────────────────
    run_due_actions_in(&mut next);

    // ── 2. Move roaming enemies, re-entering those that left the screen ─────
    for i in 0..next.enemies.len() {
        let EnemyKind::Roaming { speed } = next.enemies[i].kind else {
            continue;
        };
        next.enemies[i].x += speed * dt;

        if next.enemies[i].x > grid::visible_width() {
            let speed = placement::random_speed(&next, rng);
            let (x, y) = placement::find_position(&next, Spawn::Reentry, rng);
            let enemy = &mut next.enemies[i];
            enemy.kind = EnemyKind::Roaming { speed };
            enemy.x = x;
            enemy.y = y;
        }
    }

    // ── 3. Victory jump ──────────────────────────────────────────────────────
    if next.player.won {
        jump_in(&mut next, dt);
    }

    // ── 4. Enemies ↔ player ──────────────────────────────────────────────────
    detect_collision_in(&mut next);

    next
}

/// Bob the player between `min_y` and `min_y + jump_height`.
fn jump_in(state: &mut GameState, dt: f32) {
    let height = state.config.jump_height;
    let step = state.config.jump_rate * dt;
    let player = &mut state.player;

    let start = player.y;
    let bounds = *player.jump.get_or_insert(JumpBounds {
        min_y: start,
        max_y: start + height,
    });

    match player.phase {
        JumpPhase::Ascending => {
            player.y += step;
            if player.y >= bounds.max_y {
                player.y = bounds.max_y;
                player.phase = JumpPhase::Descending;
            }
        }
        JumpPhase::Descending => {
            player.y -= step;
            if player.y <= bounds.min_y {
                player.y = bounds.min_y;
                player.phase = JumpPhase::Ascending;
            }
        }
    }
}
