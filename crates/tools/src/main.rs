use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use geocoin::store_file::FileStore;
use geocoin::{format_location, format_snapshot_hash};
use geocoin_core::{Coin, Game, WorldConfig};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about = "Summarise a saved game", long_about = None)]
struct Args {
    /// Path to the save file
    #[arg(short, long)]
    save: PathBuf,
    /// World configuration the save was played with
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    lat: f64,
    lng: f64,
    cell: String,
    points: u32,
    inventory: usize,
    caches: usize,
    total_coins: usize,
    duplicate_coins: usize,
    history_points: usize,
    snapshot_hash: String,
    restored: Vec<&'static str>,
    defaulted: Vec<String>,
    stale_points: Option<u32>,
}

fn load_config(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    WorldConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Coin identities held in more than one place.
fn duplicate_coins(game: &Game) -> usize {
    let mut seen = BTreeSet::new();
    let all: Vec<Coin> = game
        .caches()
        .iter()
        .flat_map(|cache| cache.coins().iter().copied())
        .chain(game.inventory().coins().iter().copied())
        .collect();
    all.iter().filter(|coin| !seen.insert(**coin)).count()
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.save.exists() {
        bail!("Save file not found: {}", args.save.display());
    }
    let config = load_config(args.config.as_deref())?;
    let store = FileStore::open(&args.save)
        .with_context(|| format!("Failed to open save file: {}", args.save.display()))?;

    let mut game = Game::new(config);
    let report = game.load(&store);

    let summary = Summary {
        lat: game.location().lat,
        lng: game.location().lng,
        cell: game.current_cell().to_string(),
        points: game.points(),
        inventory: game.inventory().len(),
        caches: game.caches().len(),
        total_coins: game.total_coins(),
        duplicate_coins: duplicate_coins(&game),
        history_points: game.history().len(),
        snapshot_hash: format_snapshot_hash(game.snapshot_hash()),
        restored: report.restored.clone(),
        defaulted: report
            .defaulted
            .iter()
            .map(|(key, issue)| format!("{key}: {issue:?}"))
            .collect(),
        stale_points: report.stale_points,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Location: {} in cell {}", format_location(game.location()), summary.cell);
    println!("Points: {}", summary.points);
    println!("Inventory: {} coins", summary.inventory);
    println!("Caches: {}", summary.caches);
    println!("Total coins: {}", summary.total_coins);
    println!("History: {} points", summary.history_points);
    println!("Snapshot Hash: {}", summary.snapshot_hash);
    println!("Restored: {}", summary.restored.join(", "));
    for line in &summary.defaulted {
        println!("Defaulted {line}");
    }
    if let Some(stale) = summary.stale_points {
        println!("Saved point total {stale} disagreed with the inventory");
    }
    if summary.duplicate_coins > 0 {
        println!("Warning: {} coins are held in more than one place", summary.duplicate_coins);
    }

    Ok(())
}
