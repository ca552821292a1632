//! Shared fixtures for the `game` test suites.
//! Keeps the scripted-luck worlds in one place so each suite states only its scenario.

use super::*;
use crate::luck::FixedLuck;

/// The cell the scenario player starts in.
pub(super) const ORIGIN: Cell = Cell::new(3, 5);

pub(super) fn scenario_config(radius: u32) -> WorldConfig {
    WorldConfig {
        tile_width: 1e-4,
        visibility_radius: radius,
        spawn_probability: 0.1,
        min_coins: 1,
        max_coins: 10,
        start: LatLng::new(0.000_35, 0.000_55),
        ..WorldConfig::default()
    }
}

/// Only the origin spawns a cache, minted with four coins (serials 0..=3).
pub(super) fn scenario_game() -> Game {
    let luck = FixedLuck::new(0.9).with("3,5", 0.05).with("3,5_coins", 0.37);
    Game::with_luck(scenario_config(1), luck)
}

/// Every cell spawns a cache; coin counts vary with `seed`.
pub(super) fn crowded_game(seed: u64) -> Game {
    let config = WorldConfig { spawn_probability: 1.0, world_seed: seed, ..scenario_config(1) };
    Game::new(config)
}

pub(super) fn serials(game: &Game, cell: Cell) -> Vec<u32> {
    game.caches()
        .get(cell)
        .map(|cache| cache.coins().iter().map(|coin| coin.serial).collect())
        .unwrap_or_default()
}
