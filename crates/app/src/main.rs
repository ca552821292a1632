use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use geocoin::app_loop::{AppMode, AppState, describe_view};
use geocoin::route::RouteFile;
use geocoin::store_file::FileStore;
use geocoin_core::store::clear_saved_game;
use geocoin_core::{Game, WorldConfig};

/// Upper bound on how long the loop blocks for input while tracking is off.
const IDLE_WAIT_MS: u64 = 60_000;

#[derive(Parser)]
#[command(author, version, about = "Walk a grid of coin caches from the terminal", long_about = None)]
struct Args {
    /// World configuration in TOML; omitted keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Save file; defaults to the per-user data directory
    #[arg(short, long)]
    save: Option<PathBuf>,
    /// JSON list of {"lat", "lng"} points replayed by `track on`
    #[arg(short, long)]
    route: Option<PathBuf>,
    /// Discard any saved game and start over
    #[arg(long)]
    fresh: bool,
}

fn load_config(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = WorldConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let save_path = match args.save {
        Some(path) => path,
        None => FileStore::get_default_path()
            .context("No per-user data directory available; pass --save <file>")?,
    };
    let mut store = FileStore::open(&save_path)
        .with_context(|| format!("Failed to open save file: {}", save_path.display()))?;

    let mut game = Game::new(config.clone());
    if args.fresh {
        clear_saved_game(&mut store).context("Failed to clear the saved game")?;
        log::info!("starting a fresh game in {}", store.path().display());
    } else {
        let report = game.load(&store);
        if !report.is_fresh() {
            println!("Resumed the saved game from {}.", store.path().display());
        }
        for (key, issue) in &report.defaulted {
            log::debug!("saved {key} not restored: {issue:?}");
        }
    }

    let mut app = AppState::new(&config);
    if let Some(route_path) = &args.route {
        let route = RouteFile::load(route_path)
            .with_context(|| format!("Failed to read route file: {}", route_path.display()))?;
        log::info!("loaded route with {} points", route.remaining());
        app = app.with_location_source(Box::new(route));
    }

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                // Main loop has exited
                break;
            }
        }
    });

    let mut out = Vec::new();
    describe_view(&game, &mut out);
    print_lines(&out);
    println!("Type `help` for commands.");
    prompt()?;

    let clock = Instant::now();
    loop {
        let now_ms = clock.elapsed().as_millis() as u64;
        let wait_ms = app.next_poll_in(now_ms).unwrap_or(IDLE_WAIT_MS);
        match rx.recv_timeout(Duration::from_millis(wait_ms)) {
            Ok(line) => {
                let now_ms = clock.elapsed().as_millis() as u64;
                print_lines(&app.handle_line(&mut game, &mut store, &line, now_ms));
                if app.mode == AppMode::Finished {
                    break;
                }
                prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                game.save(&mut store).context("Failed to save on exit")?;
                break;
            }
        }

        let now_ms = clock.elapsed().as_millis() as u64;
        let updates = app.poll_tracking(&mut game, &mut store, now_ms);
        if !updates.is_empty() {
            println!();
            print_lines(&updates);
            prompt()?;
        }
    }

    Ok(())
}
