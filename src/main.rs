//! Terminal front end: raw-mode input, fixed-rate simulation and a diffing
//! renderer.
mod input;
mod render;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use input::Action;
use maze_chase::config::Config;
use maze_chase::game::{self, PLAYER_SPAWN, PURSUER_COUNT};
use maze_chase::layout::{self, Layout};
use maze_chase::{maze, Command, Game, Grid};
use render::Renderer;

fn main() -> Result<()> {
    let config = Config::from_env();
    let _guard = setup_logging(&config)?;
    info!(?config, "Starting");

    let grid = build_grid(&config);
    let mut game = Game::new(grid, config.tick_period());

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut game, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    info!(score = game.score(), "Exiting");
    result
}

/// Logs go to a file only: the terminal is in raw mode on the alternate
/// screen. The returned guard flushes the writer when dropped.
fn setup_logging(config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "maze-chase.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();
    Ok(guard)
}

fn build_grid(config: &Config) -> Grid {
    let builtin = Layout::builtin();
    let canonical = match config.maze_seed {
        Some(seed) => {
            let mut keep_open = vec![PLAYER_SPAWN];
            keep_open.extend((0..PURSUER_COUNT).map(game::pursuer_spawn));
            info!(seed, "Generating maze");
            maze::generate(seed, builtin.rows(), builtin.cols(), &keep_open)
        }
        None => builtin,
    };
    let mut grid = Grid::new(canonical);
    if let Some(path) = &config.layout_path {
        // Failure is logged inside and the previous layout stays in place.
        if let Err(err) = layout::load_layout_file(&mut grid, path) {
            warn!(%err, "Falling back to default layout");
        }
    }
    grid
}

fn run(stdout: &mut Stdout, game: &mut Game, config: &Config) -> Result<()> {
    let tick = config.tick_period();
    let mut renderer = Renderer::new(game.grid().rows(), game.grid().cols());
    let mut next_tick = Instant::now() + tick;

    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            while event::poll(Duration::ZERO)? {
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                match input::action_for(key) {
                    Some(Action::Command(Command::Quit)) => return Ok(()),
                    Some(Action::Command(command)) => {
                        game.handle(command);
                    }
                    Some(Action::Steer(dir)) => game.request_direction(dir),
                    None => {}
                }
            }
        }

        let now = Instant::now();
        if now < next_tick {
            continue;
        }
        next_tick += tick;
        if next_tick < now {
            // Fell behind; drop the backlog instead of fast-forwarding.
            next_tick = now + tick;
        }
        game.update();
        renderer.draw(stdout, game)?;
    }
}
