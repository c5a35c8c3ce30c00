mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use road_crossing::compute::{
    cycle_character, dismiss_popup, init_state, move_player, open_character_select, tick,
};
use road_crossing::config::GameConfig;
use road_crossing::entities::{Direction, GameState, PopupKind};

use display::SpriteSheet;

/// Longest step the simulation takes in one frame.  A stalled terminal
/// must not teleport enemies across the road.
const MAX_DT: f32 = 0.1;

/// Cross the road, dodge the bugs, grab the gems.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Level whose crossing wins the game.
    #[arg(long, value_name = "LEVEL", default_value_t = GameConfig::default().max_level)]
    max_level: u32,
    /// Seed for enemy speeds and placement.  Random when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Target frames per second.
    #[arg(
        long,
        value_name = "FPS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    fps: u32,
    /// Write log output to this file.  Logging is off otherwise.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Quit,
    Move(Direction),
    Confirm,
    ChangeCharacter,
}

fn key_action(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Action::Move(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Action::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Action::Move(Direction::Right))
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Confirm),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::ChangeCharacter),
        _ => None,
    }
}

fn apply_action(state: &GameState, action: Action, rng: &mut StdRng) -> GameState {
    let browsing = matches!(
        state.session.popup.as_ref().map(|p| &p.kind),
        Some(PopupKind::CharacterSelect { .. })
    );
    match action {
        Action::Move(Direction::Left) if browsing => cycle_character(state, false),
        Action::Move(Direction::Right) if browsing => cycle_character(state, true),
        Action::Move(direction) => move_player(state, direction, rng),
        Action::Confirm => dismiss_popup(state, rng),
        Action::ChangeCharacter => open_character_select(state),
        Action::Quit => state.clone(),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Each key press is applied the moment it is
/// drained from the channel; the simulation then advances by the measured
/// frame time.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame: Duration,
) -> Result<()> {
    let sheet = SpriteSheet::load();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            match key_action(code, modifiers) {
                Some(Action::Quit) => return Ok(()),
                Some(action) => *state = apply_action(state, action, rng),
                None => {}
            }
        }

        let dt = last.elapsed().as_secs_f32().min(MAX_DT);
        last = Instant::now();
        *state = tick(state, dt, rng);

        display::render(out, state, &sheet).context("failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn setup_terminal<W: Write>(out: &mut W) -> Result<()> {
    terminal::enable_raw_mode().context("cannot enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("cannot enter the alternate screen")?;
    out.execute(cursor::Hide).context("cannot hide the cursor")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = GameConfig {
        max_level: args.max_level,
        ..GameConfig::default()
    };
    config.validate().context("invalid game configuration")?;

    let (need_w, need_h) = display::required_size();
    let (width, height) = terminal::size().context("cannot query terminal size")?;
    if width < need_w || height < need_h {
        bail!("terminal is {width}x{height}, the game needs at least {need_w}x{need_h}");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = init_state(config, &mut rng);
    info!("starting at level 1 of {}", state.config.max_level);

    let mut out = BufWriter::new(stdout());
    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let result = setup_terminal(&mut out).and_then(|()| {
        // Dedicate a thread exclusively to blocking event reads, sending them
        // through a channel so the game loop never has to block on I/O.
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        });
        game_loop(&mut out, &mut state, &rx, &mut rng, frame)
    });

    // Always restore the terminal, even when setup failed halfway
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!("fatal: {e:#}");
    } else {
        info!("quit with {} points", state.session.points);
    }
    result
}
