mod display;

use std::cell::Cell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::rc::Rc;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use flight_shooter::compute::init_player;
use flight_shooter::config::GameConfig;
use flight_shooter::entities::VerticalIntent;
use flight_shooter::world::World;

use display::TerminalSurface;

/// A key counts as held if a press/repeat for it arrived this recently.
/// Covers terminals that never report key releases: the OS repeat rate keeps
/// refreshing the timestamp while the key is down.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

#[derive(Parser, Debug)]
#[command(name = "flight_shooter", about = "Side-scrolling dogfight in the terminal")]
struct Args {
    /// Seed for enemy spawn heights and fire cooldowns.
    #[arg(long)]
    seed: Option<u64>,
    /// Live enemy cap.
    #[arg(long)]
    max_enemies: Option<usize>,
    /// Milliseconds between enemy spawn attempts.
    #[arg(long)]
    spawn_interval_ms: Option<u64>,
    #[arg(long)]
    player_hp: Option<i32>,
    /// Frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

impl Args {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::default();
        if let Some(cap) = self.max_enemies {
            config.max_enemies = cap;
        }
        if let Some(ms) = self.spawn_interval_ms {
            config.enemy_spawn_interval = Duration::from_millis(ms);
        }
        if let Some(hp) = self.player_hp {
            config.player_max_hp = hp;
        }
        config
    }
}

enum Outcome {
    Finished(u32),
    Quit,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so logs only go to the file named by
/// `FLIGHT_LOG`.  Without it no subscriber is installed.
fn init_tracing() -> Result<()> {
    let Ok(path) = std::env::var("FLIGHT_LOG") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn is_fire(code: &KeyCode) -> bool {
    matches!(code, KeyCode::Char('z') | KeyCode::Char('Z') | KeyCode::Char(' '))
}

fn intent_from(held: &HashMap<KeyCode, Instant>, now: Instant) -> VerticalIntent {
    let live = |keys: &[KeyCode]| {
        keys.iter().any(|k| {
            held.get(k)
                .map(|&at| now.saturating_duration_since(at) <= HOLD_WINDOW)
                .unwrap_or(false)
        })
    };
    if live(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]) {
        VerticalIntent::Down
    } else if live(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]) {
        VerticalIntent::Up
    } else {
        VerticalIntent::None
    }
}

/// Block until one of `proceed` (true) or a quit key (false) is pressed.
fn wait_for_choice(rx: &mpsc::Receiver<Event>, proceed: &[KeyCode]) -> Result<bool> {
    loop {
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = rx.recv()?
        {
            if is_quit(&code, modifiers) {
                return Ok(false);
            }
            if proceed.contains(&code) {
                return Ok(true);
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// One encounter, from a fresh world to the player's destruction.
///
/// The frame scheduler and the spawn timer share this thread: each iteration
/// drains input, polls the spawner, advances one frame and presents it.
fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    rng: StdRng,
    frame_time: Duration,
) -> Result<Outcome> {
    let assets = display::sprite_assets();
    let mut world = World::new(config.clone(), assets, rng)?;
    world.set_player(init_player(config, &assets));

    let final_score = Rc::new(Cell::new(None));
    let sink = Rc::clone(&final_score);
    world.on_game_over(move |score| sink.set(Some(score)));

    let (cols, rows) = terminal::size()?;
    let playfield = Vec2::new(config.playfield_width, config.playfield_height);
    let mut surface = TerminalSurface::new(cols, rows, playfield);

    // Maps each held key to when it was last seen (press or repeat).
    let mut held: HashMap<KeyCode, Instant> = HashMap::new();

    world.start_spawner(Instant::now());
    info!(max_enemies = config.max_enemies, "round started");

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        if is_quit(&code, modifiers) {
                            return Ok(Outcome::Quit);
                        }
                        if is_fire(&code) {
                            world.handle_fire_input()?;
                        }
                        held.insert(code, frame_start);
                    }
                    // Repeats keep a key held but never fire.
                    KeyEventKind::Repeat => {
                        held.insert(code, frame_start);
                    }
                    KeyEventKind::Release => {
                        held.remove(&code);
                    }
                },
                Event::Resize(c, r) => surface.resize(c, r),
                _ => {}
            }
        }

        world.set_vertical_intent(intent_from(&held, frame_start));
        world.poll_spawner(frame_start);
        world.advance_frame(&mut surface)?;
        surface.present(out)?;

        if let Some(score) = final_score.get() {
            return Ok(Outcome::Finished(score));
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(args.fps > 0, "--fps must be at least 1");
    init_tracing()?;

    let config = args.config();
    config.validate()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the game loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &args, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
    config: &GameConfig,
) -> Result<()> {
    let frame_time = Duration::from_secs(1) / args.fps;

    display::title_screen(out)?;
    if !wait_for_choice(rx, &[KeyCode::Enter, KeyCode::Char(' ')])? {
        return Ok(());
    }

    loop {
        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        match play(out, rx, config, rng, frame_time)? {
            Outcome::Quit => break,
            Outcome::Finished(score) => {
                info!(score, "round finished");
                display::summary_screen(out, score)?;
                if !wait_for_choice(rx, &[KeyCode::Char('r'), KeyCode::Char('R')])? {
                    break;
                }
            }
        }
    }
    Ok(())
}
