//! The owned game aggregate. Every mutation of the world goes through a `Game` method,
//! so the board, the cache registry, and the player never drift apart.

use crate::board::Board;
use crate::cache::{Cache, CacheRegistry, CacheSnapshot, MintRule};
use crate::config::WorldConfig;
use crate::luck::{HashLuck, LuckSource};
use crate::state::{Inventory, Player};
use crate::types::*;

mod hash;
mod persistence;

pub use persistence::{FieldIssue, LoadReport};

pub struct Game {
    config: WorldConfig,
    rule: MintRule,
    luck: Box<dyn LuckSource>,
    board: Board,
    caches: CacheRegistry,
    player: Player,
    visible: Vec<CellId>,
    log: Vec<LogEvent>,
}

impl Game {
    pub fn new(config: WorldConfig) -> Self {
        let luck = HashLuck { seed: config.world_seed };
        Self::with_luck(config, luck)
    }

    pub fn with_luck(config: WorldConfig, luck: impl LuckSource + 'static) -> Self {
        let mut game = Self {
            rule: config.mint_rule(),
            luck: Box::new(luck),
            board: Board::new(config.tile_width),
            caches: CacheRegistry::new(),
            player: Player::at(config.start),
            visible: Vec::new(),
            log: Vec::new(),
            config,
        };
        game.refresh_visible();
        game
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn location(&self) -> LatLng {
        self.player.location
    }

    pub fn points(&self) -> u32 {
        self.player.points
    }

    pub fn inventory(&self) -> &Inventory {
        &self.player.inventory
    }

    pub fn history(&self) -> &[LatLng] {
        &self.player.history
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn current_cell(&self) -> Cell {
        self.board.locate(self.player.location)
    }

    pub fn cell_bounds(&self, cell: Cell) -> CellBounds {
        self.board.cell_bounds(cell)
    }

    /// Moves exactly one tile.
    pub fn step(&mut self, direction: Direction) {
        let (di, dj) = direction.delta();
        let width = self.config.tile_width;
        let target = self.player.location.offset(f64::from(di) * width, f64::from(dj) * width);
        self.move_to(target);
    }

    pub fn move_to(&mut self, point: LatLng) {
        let from = self.current_cell();
        self.player.location = point;
        if self.player.history.last() != Some(&point) {
            self.player.history.push(point);
        }
        let to = self.current_cell();
        if from != to {
            log::debug!("player moved from {from} to {to}");
            self.log.push(LogEvent::Moved { from, to });
        }
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible = self.board.cells_near(self.player.location, self.config.visibility_radius);
        for &id in &self.visible {
            let cell = self.board.cell(id);
            if self.caches.contains(cell) {
                continue;
            }
            if let Some(cache) = self.caches.ensure_cache(cell, &self.rule, self.luck.as_ref()) {
                self.log.push(LogEvent::CacheMinted { cell, coins: cache.len() as u32 });
            }
        }
    }

    /// Cells in the current neighbourhood, row-major.
    pub fn visible_cells(&self) -> Vec<Cell> {
        self.visible.iter().map(|&id| self.board.cell(id)).collect()
    }

    pub fn visible_caches(&self) -> impl Iterator<Item = &Cache> + '_ {
        self.visible.iter().filter_map(|&id| self.caches.get(self.board.cell(id)))
    }

    pub fn is_within_reach(&self, cell: Cell) -> bool {
        self.board.is_near(self.player.location, self.config.visibility_radius, cell)
    }

    pub fn collect(&mut self, cell: Cell) -> Transfer {
        if !self.is_within_reach(cell) {
            return Transfer::Skipped(SkipReason::OutOfReach);
        }
        let transfer = self.caches.collect(cell);
        if let Transfer::Moved(coin) = transfer {
            self.player.inventory.push(coin);
            self.player.points += 1;
            debug_assert_eq!(self.player.points as usize, self.player.inventory.len());
            self.log.push(LogEvent::CoinCollected { coin, from: cell });
        }
        transfer
    }

    /// Deposits the most recently collected coin into the cache at `cell`.
    pub fn deposit(&mut self, cell: Cell) -> Transfer {
        match self.player.inventory.last() {
            Some(coin) => self.deposit_coin(cell, coin),
            None if !self.is_within_reach(cell) => Transfer::Skipped(SkipReason::OutOfReach),
            None => Transfer::Skipped(SkipReason::EmptyInventory),
        }
    }

    pub fn deposit_coin(&mut self, cell: Cell, coin: Coin) -> Transfer {
        if !self.is_within_reach(cell) {
            return Transfer::Skipped(SkipReason::OutOfReach);
        }
        if self.player.inventory.is_empty() {
            return Transfer::Skipped(SkipReason::EmptyInventory);
        }
        if !self.caches.contains(cell) {
            return Transfer::Skipped(SkipReason::NoCache);
        }
        let Some(coin) = self.player.inventory.take(coin) else {
            return Transfer::Skipped(SkipReason::NotInInventory);
        };
        if let Err(coin) = self.caches.deposit(cell, coin) {
            self.player.inventory.push(coin);
            return Transfer::Skipped(SkipReason::NoCache);
        }
        self.player.points -= 1;
        debug_assert_eq!(self.player.points as usize, self.player.inventory.len());
        self.log.push(LogEvent::CoinDeposited { coin, into: cell });
        Transfer::Moved(coin)
    }

    pub fn locate(&self, coin: Coin) -> Option<CoinLocation> {
        if self.player.inventory.contains(coin) {
            return Some(CoinLocation::InInventory);
        }
        self.caches.find(coin).map(CoinLocation::InCache)
    }

    /// Coins in every cache plus the inventory.
    pub fn total_coins(&self) -> usize {
        self.caches.total_coins() + self.player.inventory.len()
    }

    pub fn cache_snapshot(&self) -> CacheSnapshot {
        self.caches.snapshot()
    }

    /// Replaces the registry verbatim, then mints only neighbourhood cells it lacks.
    pub fn restore_caches(&mut self, snapshot: CacheSnapshot) {
        self.caches.restore(snapshot);
        self.refresh_visible();
    }

    /// Returns the world to its minted baseline. Only the literal word `yes` confirms.
    ///
    /// Coins are regrouped under the cell that minted them rather than minted again, so
    /// caches already discovered keep their identities. Returns how many coins left the
    /// inventory.
    pub fn reset(&mut self, confirmation: &str) -> Result<usize, GameError> {
        if !confirmation.trim().eq_ignore_ascii_case("yes") {
            return Err(GameError::ResetNotConfirmed);
        }
        let loose = self.player.inventory.drain();
        let coins_returned = loose.len();
        self.caches.return_coins_to_origin(loose);
        self.player = Player::at(self.config.start);
        log::info!(
            "world reset: {coins_returned} coins returned, {} caches restored",
            self.caches.len()
        );
        self.log.push(LogEvent::WorldReset { coins_returned });
        self.refresh_visible();
        Ok(coins_returned)
    }
}

#[cfg(test)]
mod test_support;
